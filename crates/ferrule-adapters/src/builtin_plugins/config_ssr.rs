//! `builtin:config-ssr` - server bundle configuration and the client-side
//! SSR manifest plugin.

use async_trait::async_trait;
use anyhow::Context as _;
use serde_json::{Value, json};

use ferrule_core::prelude::*;

pub const NAME: &str = "builtin:config-ssr";

/// Import paths kept inside the server bundle.
const BUNDLED_PATTERNS: [&str; 4] = ["^components", "^assets", "^pages", r"\.(scss|css)$"];

pub struct SsrConfigPlugin;

#[async_trait]
impl Plugin for SsrConfigPlugin {
    fn name(&self) -> &str {
        NAME
    }

    async fn apply(&self, host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
        host.chain_webpack(|chain, options, host| {
            match options.target {
                BuildTarget::Node => configure_server(chain, host),
                BuildTarget::Web => {
                    configure_client(chain, options, host);
                    Ok(())
                }
                BuildTarget::Storybook => Ok(()),
            }
        });
        Ok(())
    }
}

fn configure_server(chain: &mut ConfigChain, host: &Host) -> anyhow::Result<()> {
    let config = host.config();
    let ssr = config
        .ssr_config
        .as_ref()
        .context("ssrConfig is required to build the server bundle")?;
    let development = host.mode() == BuildMode::Development;

    chain
        .mode(host.mode().as_str())
        .devtool(false)
        .target("node");

    match &ssr.entry {
        Some(Value::Object(map)) => {
            for (name, files) in map {
                let files: Vec<String> = match files {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    Value::String(file) => vec![file.clone()],
                    _ => Vec::new(),
                };
                chain.entry(name).merge(files);
            }
        }
        _ => {
            for entry in host.node_entries()? {
                let file = config.pages_path.join(&entry.name).join("index.node");
                chain.entry(&entry.name).add(file.display().to_string());
            }
        }
    }

    let public_path = if development {
        String::new()
    } else {
        config.public_path.clone()
    };
    chain
        .output()
        .path(&ssr.dist)
        .public_path(public_path)
        .filename("[name].js")
        .library_target("commonjs2");

    chain.externals([json!({
        "type": "node-externals",
        "allowlist": BUNDLED_PATTERNS,
    })]);
    chain.set(
        "optimization",
        json!({ "splitChunks": false, "minimizer": [], "runtimeChunk": false }),
    );
    Ok(())
}

/// Production builds, or development builds that asked for SSR, emit the
/// manifest the SSR runtime reads.
fn configure_client(chain: &mut ConfigChain, options: &BuildOptions, host: &Host) {
    let config = host.config();
    let wanted = match options.mode {
        BuildMode::Production => true,
        BuildMode::Development => options.ssr,
    };
    if !(wanted && config.ssr) {
        return;
    }
    chain.plugin("ssr-plugin").use_plugin(
        "ferrule/ssr-plugin",
        vec![json!({
            "dist": config.dist,
            "mode": options.mode.as_str(),
            "pagesPath": config.pages_path,
            "ssrConfig": config.ssr_config,
        })],
    );
}
