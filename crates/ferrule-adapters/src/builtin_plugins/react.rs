//! `builtin:react` - create, page and component scaffolding for React projects.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use ferrule_core::application::hooks::names;
use ferrule_core::prelude::*;

use super::templates;

pub const NAME: &str = "builtin:react";
pub const TYPE: &str = "react";

pub struct ReactPlugin;

#[async_trait]
impl Plugin for ReactPlugin {
    fn name(&self) -> &str {
        NAME
    }

    async fn apply(&self, host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
        host.register_create_type(TYPE, "React application", Arc::new(CreateApp))
            .register_page_type(TYPE, "React page", Arc::new(AddPage))
            .register_component_type(TYPE, "React component", Arc::new(AddComponent));
        Ok(())
    }
}

struct CreateApp;

#[async_trait]
impl CreateAction for CreateApp {
    async fn create(&self, host: &mut Host, request: &CreateRequest) -> anyhow::Result<()> {
        let cx = RenderContext::new().with_name("PROJECT_NAME", &request.name);
        let structure = templates::react_app(&request.project_dir, &cx);

        let fs = host.filesystem().clone();
        ScaffoldWriter::new(fs.as_ref()).overwrite(true).write(&structure)?;
        info!(dir = %request.project_dir.display(), "react project created");

        let payload = serde_json::to_value(request)?;
        host.invoke_hook(names::AFTER_CREATE, &mut HookArgs::Payload(&payload))
            .await?;
        Ok(())
    }
}

struct AddPage;

#[async_trait]
impl ScaffoldAction for AddPage {
    async fn scaffold(&self, host: &mut Host, request: &ScaffoldRequest) -> anyhow::Result<()> {
        let cx = RenderContext::new().with_name("PAGE_NAME", &request.name);
        let structure = templates::react_page(&host.config().pages_path, &cx);

        let fs = host.filesystem().clone();
        ScaffoldWriter::new(fs.as_ref()).write(&structure)?;
        info!(dir = %structure.root().display(), "page created");

        let payload = json!({ "name": request.name, "dir": structure.root() });
        host.invoke_hook(names::AFTER_ADD_PAGE, &mut HookArgs::Payload(&payload))
            .await?;
        Ok(())
    }
}

struct AddComponent;

#[async_trait]
impl ScaffoldAction for AddComponent {
    async fn scaffold(&self, host: &mut Host, request: &ScaffoldRequest) -> anyhow::Result<()> {
        let cx = RenderContext::new().with_name("COMPONENT_NAME", &request.name);
        let structure = templates::react_component(&host.resolve_path(["src", "components"]), &cx);

        let fs = host.filesystem().clone();
        ScaffoldWriter::new(fs.as_ref()).write(&structure)?;
        info!(dir = %structure.root().display(), "component created");

        let payload = json!({ "name": request.name, "dir": structure.root() });
        host.invoke_hook(names::AFTER_ADD_COMPONENT, &mut HookArgs::Payload(&payload))
            .await?;
        Ok(())
    }
}
