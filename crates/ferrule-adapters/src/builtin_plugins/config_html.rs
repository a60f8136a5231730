//! `builtin:config-html` - one HTML page per web entry.

use async_trait::async_trait;
use serde_json::{Value, json};

use ferrule_core::prelude::*;

pub const NAME: &str = "builtin:config-html";

pub struct HtmlConfig;

#[async_trait]
impl Plugin for HtmlConfig {
    fn name(&self) -> &str {
        NAME
    }

    async fn apply(&self, host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
        host.chain_webpack(|chain, options, host| {
            if options.target != BuildTarget::Web {
                return Ok(());
            }
            let minify = options.mode.is_production();
            for entry in host.entries()? {
                chain.plugin(&format!("html-{}", entry.name)).use_plugin(
                    "html-webpack-plugin",
                    vec![json!({
                        "filename": format!("{}.html", entry.name),
                        "template": entry.template,
                        "chunks": entry.chunks,
                        "inject": true,
                        "minify": minify,
                    })],
                );
            }
            Ok(())
        });
        Ok(())
    }
}
