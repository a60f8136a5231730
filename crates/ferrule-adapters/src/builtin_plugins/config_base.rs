//! `builtin:config-base` - the configuration every build starts from.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use ferrule_core::prelude::*;

pub const NAME: &str = "builtin:config-base";

pub struct BaseConfig;

#[async_trait]
impl Plugin for BaseConfig {
    fn name(&self) -> &str {
        NAME
    }

    async fn apply(&self, host: &mut Host, _args: &[Value]) -> anyhow::Result<()> {
        host.chain_webpack(|chain, options, host| {
            chain.mode(options.mode.as_str()).context(host.root());

            if options.target.is_browser() {
                for entry in host.entries()? {
                    chain.entry(&entry.name).merge(entry.entry);
                }
            }

            let config = host.config();
            let filenames = &config.output_filenames;
            chain
                .output()
                .path(&config.dist)
                .filename(filenames.js.clone())
                .chunk_filename(filenames.js.clone())
                .public_path(config.public_path.clone());

            chain
                .rule("js")
                .test(r"\.(js|mjs|jsx|ts|tsx)$")
                .exclude("node_modules")
                .use_loader("babel")
                .loader("babel-loader")
                .options(json!({
                    "cacheDirectory": config.cache_directory.join("babel-loader"),
                }));

            let css = chain.rule("css").test(r"\.css$");
            if options.extract_css {
                css.use_loader("extract").loader("mini-css-extract-plugin/loader");
            } else {
                css.use_loader("style").loader("style-loader");
            }
            css.use_loader("css").loader("css-loader");

            chain
                .rule("assets")
                .test(r"\.(png|jpe?g|gif|svg|woff2?|eot|ttf)$")
                .use_loader("url")
                .loader("url-loader")
                .options(json!({
                    "limit": 10000,
                    "name": format!("assets/{}", filenames.file),
                }));

            chain
                .plugin("define")
                .use_plugin("webpack.DefinePlugin", vec![define_values(host)]);

            if options.extract_css {
                chain.plugin("extract-css").use_plugin(
                    "mini-css-extract-plugin",
                    vec![json!({ "filename": filenames.css })],
                );
            }
            Ok(())
        });
        Ok(())
    }
}

/// `process.env.<KEY>` definitions with JSON-encoded values.
fn define_values(host: &Host) -> Value {
    let mut defs = Map::new();
    for (key, value) in host.envs() {
        defs.insert(
            format!("process.env.{key}"),
            Value::String(value.to_string()),
        );
    }
    defs.insert(
        "process.env.NODE_ENV".into(),
        Value::String(Value::String(host.mode().as_str().to_string()).to_string()),
    );
    Value::Object(defs)
}
