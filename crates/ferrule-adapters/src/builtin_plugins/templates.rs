//! Scaffolding templates shipped with the built-in plugins.
//!
//! Each function renders a small file set with `{{VARIABLE}}` substitution
//! into a [`ProjectStructure`] rooted where it should be written.

use std::path::Path;

use ferrule_core::domain::{ProjectStructure, RenderContext};

/// Minimal React application.
///
/// Variables: `PROJECT_NAME` (and its derived spellings).
pub fn react_app(dir: &Path, cx: &RenderContext) -> ProjectStructure {
    let files: [(&str, &str); 7] = [
        (
            "package.json",
            r#"{
  "name": "{{PROJECT_NAME}}",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "dev": "ferrule dev",
    "build": "ferrule build"
  },
  "dependencies": {
    "react": "^16.12.0",
    "react-dom": "^16.12.0"
  },
  "devDependencies": {
    "eslint": "^6.8.0"
  }
}
"#,
        ),
        (
            "ferrule.config.json",
            r#"{
  "type": "react",
  "publicPath": "/"
}
"#,
        ),
        (
            "src/common/template.html",
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{{PROJECT_NAME_PASCAL}}</title>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#,
        ),
        (
            "src/pages/index/index.jsx",
            r#"import React from 'react';
import ReactDOM from 'react-dom';
import './index.css';

const App = () => <h1>{{PROJECT_NAME_PASCAL}}</h1>;

ReactDOM.render(<App />, document.getElementById('root'));
"#,
        ),
        ("src/pages/index/index.css", "h1 {\n  font-family: sans-serif;\n}\n"),
        (".gitignore", "node_modules\ndist\n.env.local\n"),
        (".env", "FERRULE_APP_NAME={{PROJECT_NAME_KEBAB}}\n"),
    ];

    let mut structure = ProjectStructure::new(dir).with_directory("src/components");
    for (path, content) in files {
        structure.add_file(path, cx.render(content));
    }
    structure
}

/// TypeScript sample project.
pub fn typescript_sample(dir: &Path, cx: &RenderContext) -> ProjectStructure {
    ProjectStructure::new(dir)
        .with_file(
            "package.json",
            cx.render(
                r#"{
  "name": "{{PROJECT_NAME}}",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "build": "ferrule build"
  },
  "devDependencies": {
    "typescript": "^3.7.0"
  }
}
"#,
            ),
        )
        .with_file(
            "tsconfig.json",
            r#"{
  "compilerOptions": {
    "target": "es5",
    "module": "esnext",
    "strict": true,
    "jsx": "react"
  },
  "include": ["src"]
}
"#,
        )
        .with_file(
            "ferrule.config.json",
            "{\n  \"type\": \"typescript-sample\"\n}\n",
        )
        .with_file(
            "src/pages/index/index.ts",
            cx.render("document.title = '{{PROJECT_NAME_PASCAL}}';\n"),
        )
}

/// A page directory: `<pages>/<name>/index.jsx` and its stylesheet.
///
/// Variables: `PAGE_NAME`.
pub fn react_page(pages_dir: &Path, cx: &RenderContext) -> ProjectStructure {
    let name = cx.get("PAGE_NAME_KEBAB").unwrap_or("page");
    ProjectStructure::new(pages_dir.join(name))
        .with_file(
            "index.jsx",
            cx.render(
                r#"import React from 'react';
import ReactDOM from 'react-dom';
import './index.css';

const {{PAGE_NAME_PASCAL}} = () => <div className="{{PAGE_NAME_KEBAB}}">{{PAGE_NAME}}</div>;

ReactDOM.render(<{{PAGE_NAME_PASCAL}} />, document.getElementById('root'));
"#,
            ),
        )
        .with_file("index.css", cx.render(".{{PAGE_NAME_KEBAB}} {\n}\n"))
}

/// A component directory: `<components>/<Name>/index.jsx` and its stylesheet.
///
/// Variables: `COMPONENT_NAME`.
pub fn react_component(components_dir: &Path, cx: &RenderContext) -> ProjectStructure {
    let name = cx.get("COMPONENT_NAME_PASCAL").unwrap_or("Component");
    ProjectStructure::new(components_dir.join(name))
        .with_file(
            "index.jsx",
            cx.render(
                r#"import React from 'react';
import './index.css';

export default function {{COMPONENT_NAME_PASCAL}}(props) {
  return <div className="{{COMPONENT_NAME_KEBAB}}">{props.children}</div>;
}
"#,
            ),
        )
        .with_file("index.css", cx.render(".{{COMPONENT_NAME_KEBAB}} {\n}\n"))
}
