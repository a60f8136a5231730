//! Create / page / component type registries and their dispatch.
//!
//! Plugins register scaffolding actions under a type key. `create` looks the
//! key up from the user's choice; `page` and `component` use the project's
//! configured `type`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::host::Host;
use crate::error::FerruleResult;

/// A `create` request, after the CLI has gathered its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Project name (package name).
    pub name: String,
    /// Absolute directory the project is created in.
    pub project_dir: PathBuf,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A `page` or `component` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldRequest {
    pub name: String,
}

#[async_trait]
pub trait CreateAction: Send + Sync {
    async fn create(&self, host: &mut Host, request: &CreateRequest) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ScaffoldAction: Send + Sync {
    async fn scaffold(&self, host: &mut Host, request: &ScaffoldRequest) -> anyhow::Result<()>;
}

pub struct TypeEntry<A: ?Sized> {
    pub kind: String,
    pub description: String,
    pub action: Arc<A>,
}

impl<A: ?Sized> Clone for TypeEntry<A> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            description: self.description.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

/// Type key → action, in registration order.
///
/// Lookup is by exact key; the first entry registered for a key wins.
pub struct TypeRegistry<A: ?Sized> {
    entries: Vec<TypeEntry<A>>,
}

impl<A: ?Sized> Default for TypeRegistry<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: ?Sized> TypeRegistry<A> {
    pub fn register(&mut self, kind: &str, description: &str, action: Arc<A>) {
        self.entries.push(TypeEntry {
            kind: kind.to_string(),
            description: description.to_string(),
            action,
        });
    }

    pub fn find(&self, kind: &str) -> Option<&TypeEntry<A>> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entries(&self) -> &[TypeEntry<A>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of dispatching a request to a type registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Unsupported { reason: String },
}

/// Listing row for prompts and `--help` style output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl Host {
    pub fn register_create_type(
        &mut self,
        kind: &str,
        description: &str,
        action: Arc<dyn CreateAction>,
    ) -> &mut Self {
        self.create_types.register(kind, description, action);
        self
    }

    pub fn register_page_type(
        &mut self,
        kind: &str,
        description: &str,
        action: Arc<dyn ScaffoldAction>,
    ) -> &mut Self {
        self.page_types.register(kind, description, action);
        self
    }

    pub fn register_component_type(
        &mut self,
        kind: &str,
        description: &str,
        action: Arc<dyn ScaffoldAction>,
    ) -> &mut Self {
        self.component_types.register(kind, description, action);
        self
    }

    pub fn create_types(&self) -> Vec<TypeInfo> {
        self.create_types
            .entries()
            .iter()
            .map(|e| TypeInfo {
                kind: e.kind.clone(),
                description: e.description.clone(),
            })
            .collect()
    }

    /// Run the create action registered for `request.kind`.
    #[instrument(skip_all, fields(kind = %request.kind, dir = %request.project_dir.display()))]
    pub async fn create_project(&mut self, request: CreateRequest) -> FerruleResult<DispatchOutcome> {
        let Some(entry) = self.create_types.find(&request.kind).cloned() else {
            let reason = format!("create \"{}\" not supported", request.kind);
            warn!("{reason}");
            return Ok(DispatchOutcome::Unsupported { reason });
        };
        info!("{}", entry.description);
        entry.action.create(self, &request).await?;
        Ok(DispatchOutcome::Handled)
    }

    /// Run the page action for the project's `type`.
    pub async fn add_page(&mut self, request: ScaffoldRequest) -> FerruleResult<DispatchOutcome> {
        let entry = match self.project_type_entry(Registry::Page) {
            Ok(entry) => entry,
            Err(outcome) => return Ok(outcome),
        };
        entry.action.scaffold(self, &request).await?;
        Ok(DispatchOutcome::Handled)
    }

    /// Run the component action for the project's `type`.
    pub async fn add_component(
        &mut self,
        request: ScaffoldRequest,
    ) -> FerruleResult<DispatchOutcome> {
        let entry = match self.project_type_entry(Registry::Component) {
            Ok(entry) => entry,
            Err(outcome) => return Ok(outcome),
        };
        entry.action.scaffold(self, &request).await?;
        Ok(DispatchOutcome::Handled)
    }

    fn project_type_entry(
        &self,
        which: Registry,
    ) -> Result<TypeEntry<dyn ScaffoldAction>, DispatchOutcome> {
        let Some(kind) = self.config().project_type.as_deref() else {
            let reason = "your project does not support this command".to_string();
            warn!("{reason}");
            return Err(DispatchOutcome::Unsupported { reason });
        };

        let registry = match which {
            Registry::Page => &self.page_types,
            Registry::Component => &self.component_types,
        };
        registry.find(kind).cloned().ok_or_else(|| {
            let reason = format!(
                "your project (type is {kind}) does not support creating a {}",
                which.noun()
            );
            warn!("{reason}");
            DispatchOutcome::Unsupported { reason }
        })
    }
}

#[derive(Clone, Copy)]
enum Registry {
    Page,
    Component,
}

impl Registry {
    fn noun(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Component => "component",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::application::test_support::{FakeFs, host_with, test_host};

    struct Record(Arc<Mutex<Vec<String>>>, &'static str);

    #[async_trait]
    impl ScaffoldAction for Record {
        async fn scaffold(&self, _host: &mut Host, request: &ScaffoldRequest) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(format!("{}:{}", self.1, request.name));
            Ok(())
        }
    }

    #[async_trait]
    impl CreateAction for Record {
        async fn create(&self, _host: &mut Host, request: &CreateRequest) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(format!("{}:{}", self.1, request.name));
            Ok(())
        }
    }

    fn page(name: &str) -> ScaffoldRequest {
        ScaffoldRequest { name: name.into() }
    }

    #[tokio::test]
    async fn page_without_project_type_is_a_no_op() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = test_host();
        host.register_page_type("react", "React page", Arc::new(Record(log.clone(), "react")));

        let outcome = host.add_page(page("home")).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Unsupported { .. }));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unmatched_type_warns_and_does_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = host_with(Some(json!({ "type": "vue" })), FakeFs::new());
        host.register_component_type("react", "React component", Arc::new(Record(log.clone(), "react")));

        let outcome = host.add_component(page("Button")).await.unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Unsupported {
                reason: "your project (type is vue) does not support creating a component".into()
            }
        );
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_registered_type_wins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = host_with(Some(json!({ "type": "react" })), FakeFs::new());
        host.register_page_type("react", "first", Arc::new(Record(log.clone(), "first")))
            .register_page_type("react", "second", Arc::new(Record(log.clone(), "second")));

        assert_eq!(host.add_page(page("home")).await.unwrap(), DispatchOutcome::Handled);
        assert_eq!(*log.lock().unwrap(), ["first:home"]);
    }

    #[tokio::test]
    async fn create_dispatches_by_requested_type() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = test_host();
        host.register_create_type("react", "React app", Arc::new(Record(log.clone(), "react")));

        let request = CreateRequest {
            name: "shop".into(),
            project_dir: "/work/shop".into(),
            kind: "react".into(),
        };
        assert_eq!(host.create_project(request.clone()).await.unwrap(), DispatchOutcome::Handled);

        let unknown = CreateRequest {
            kind: "svelte".into(),
            ..request
        };
        assert!(matches!(
            host.create_project(unknown).await.unwrap(),
            DispatchOutcome::Unsupported { .. }
        ));
        assert_eq!(*log.lock().unwrap(), ["react:shop"]);
        assert_eq!(host.create_types()[0].kind, "react");
    }
}
