//! `builtin:create-ts` - the `typescript-sample` create type.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use ferrule_core::application::hooks::names;
use ferrule_core::prelude::*;

use super::templates;

pub const NAME: &str = "builtin:create-ts";
pub const TYPE: &str = "typescript-sample";

pub struct CreateTsPlugin;

#[async_trait]
impl Plugin for CreateTsPlugin {
    fn name(&self) -> &str {
        NAME
    }

    async fn apply(&self, host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
        host.register_create_type(TYPE, "TypeScript sample project", Arc::new(CreateSample));
        Ok(())
    }
}

struct CreateSample;

#[async_trait]
impl CreateAction for CreateSample {
    async fn create(&self, host: &mut Host, request: &CreateRequest) -> anyhow::Result<()> {
        let cx = RenderContext::new().with_name("PROJECT_NAME", &request.name);
        let structure = templates::typescript_sample(&request.project_dir, &cx);

        let fs = host.filesystem().clone();
        ScaffoldWriter::new(fs.as_ref()).overwrite(true).write(&structure)?;

        let payload = serde_json::to_value(request)?;
        host.invoke_hook(names::AFTER_CREATE, &mut HookArgs::Payload(&payload))
            .await?;
        Ok(())
    }
}
