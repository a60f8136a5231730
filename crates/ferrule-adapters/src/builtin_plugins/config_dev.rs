//! `builtin:config-dev` - development-only additions to browser builds.
//!
//! Hot module replacement always; an eslint pre-loader and the stylelint
//! plugin when enabled. Both linters default to on when the project lists
//! them in `devDependencies`; `{ "eslint": bool, "stylelint": bool }` as the
//! plugin argument overrides that.

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use ferrule_core::prelude::*;

pub const NAME: &str = "builtin:config-dev";

const STYLELINT_CONFIGS: [&str; 5] = [
    ".stylelintrc.js",
    ".stylelintrc.yaml",
    ".stylelintrc.yml",
    ".stylelintrc.json",
    ".stylelintrc",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LintOptions {
    pub eslint: Option<bool>,
    pub stylelint: Option<bool>,
}

#[derive(Debug, Default)]
pub struct DevConfig {
    lint: LintOptions,
}

impl DevConfig {
    pub fn from_args(args: &[Value]) -> anyhow::Result<Self> {
        let lint = match args.first() {
            None | Some(Value::Null) => LintOptions::default(),
            Some(value) => serde_json::from_value(value.clone())?,
        };
        Ok(Self { lint })
    }

    /// Constructor registered with the plugin loader.
    pub fn constructor() -> PluginConstructor {
        PluginConstructor::new(NAME, |args| {
            Ok(Arc::new(DevConfig::from_args(args)?) as Arc<dyn Plugin>)
        })
    }
}

#[async_trait]
impl Plugin for DevConfig {
    fn name(&self) -> &str {
        NAME
    }

    async fn apply(&self, host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
        let eslint = match self.lint.eslint {
            Some(on) => on,
            None => host.has_dependency("eslint", "dev")?,
        };
        let stylelint = match self.lint.stylelint {
            Some(on) => on,
            None => host.has_dependency("stylelint", "dev")?,
        };

        host.chain_webpack(move |chain, options, host| {
            let browser = matches!(options.target, BuildTarget::Web | BuildTarget::Storybook);
            if !browser || host.mode() != BuildMode::Development {
                return Ok(());
            }

            if eslint {
                chain
                    .rule("eslint")
                    .test(r"\.(js|mjs|jsx)$")
                    .pre()
                    .include(host.resolve_path(["src"]).display().to_string())
                    .use_loader("eslint")
                    .loader("eslint-loader")
                    .options(json!({
                        "emitError": false,
                        "failOnError": false,
                        "failOnWarning": false,
                        "quit": true,
                        "cache": host.config().cache_directory.join("eslint-loader"),
                        "eslintPath": host.resolve_path(["node_modules", "eslint"]),
                    }));
            }

            if stylelint {
                let fs = host.filesystem();
                let configured = STYLELINT_CONFIGS
                    .iter()
                    .any(|name| fs.exists(&host.resolve_path([name])));
                if !configured {
                    bail!(
                        "stylelint is enabled but no stylelint configuration was found in {}",
                        host.root().display()
                    );
                }
                chain.plugin("StyleLintPlugin").use_plugin(
                    "stylelint-webpack-plugin",
                    vec![json!({ "formatter": "stylelint-formatter-pretty" })],
                );
            }

            chain
                .plugin("HotModuleReplacementPlugin")
                .use_plugin("webpack.HotModuleReplacementPlugin", Vec::new());
            Ok(())
        });
        Ok(())
    }
}
