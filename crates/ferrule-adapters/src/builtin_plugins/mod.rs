//! Plugins shipped with ferrule.
//!
//! They form the `build-in` tier and are applied before any project or
//! global plugin, so their names can never be taken over.

mod config_base;
mod config_dev;
mod config_html;
mod config_ssr;
mod create_ts;
mod react;
pub mod templates;

use ferrule_core::prelude::*;

pub use config_base::BaseConfig;
pub use config_dev::{DevConfig, LintOptions};
pub use config_html::HtmlConfig;
pub use config_ssr::SsrConfigPlugin;
pub use create_ts::CreateTsPlugin;
pub use react::ReactPlugin;

/// Built-in plugin names, in application order.
pub const NAMES: [&str; 6] = [
    react::NAME,
    create_ts::NAME,
    config_base::NAME,
    config_dev::NAME,
    config_html::NAME,
    config_ssr::NAME,
];

/// Create type keys registered by the built-ins.
pub const REACT_TYPE: &str = react::TYPE;
pub const TYPESCRIPT_SAMPLE_TYPE: &str = create_ts::TYPE;

/// Every built-in plugin, ready for the loader.
pub fn all() -> Vec<PluginSpecifier> {
    vec![
        PluginSpecifier::Module(PluginModule::instance(ReactPlugin)),
        PluginSpecifier::Module(PluginModule::instance(CreateTsPlugin)),
        PluginSpecifier::Module(PluginModule::instance(BaseConfig)),
        PluginSpecifier::Module(PluginModule::Constructor(DevConfig::constructor())),
        PluginSpecifier::Module(PluginModule::instance(HtmlConfig)),
        PluginSpecifier::Module(PluginModule::instance(SsrConfigPlugin)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_listed_in_application_order() {
        let names: Vec<String> = all()
            .iter()
            .map(|spec| match spec {
                PluginSpecifier::Module(module) => module.name().to_string(),
                other => panic!("unexpected specifier {other:?}"),
            })
            .collect();
        assert_eq!(names, NAMES);
    }
}
