//! Metadata and collection envelopes common to every Argo resource.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `apiVersion` written on every resource this crate builds.
pub const API_VERSION: &str = "argoproj.io/v1alpha1";

/// Namespace used when a caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "argo";

/// Kubernetes-style object metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Prefix the server uses to derive a unique name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    /// Assigned by the server; absent on objects that were never stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<IndexMap<String, String>>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }
}

/// Collection response. The server sends `"items": null` (or omits it) for
/// an empty collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceList<T> {
    pub items: Option<Vec<T>>,
}

impl<T> ResourceList<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Workflow, WorkflowPhase, WorkflowTemplate};

    #[test]
    fn null_or_missing_items_are_empty() {
        let missing: ResourceList<ObjectMeta> = serde_json::from_str(r#"{"metadata":{}}"#).unwrap();
        assert!(missing.into_items().is_empty());
        let null: ResourceList<ObjectMeta> = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(null.into_items().is_empty());
    }

    #[test]
    fn workflow_list_decodes_without_default_items() {
        let listed: ResourceList<Workflow> = serde_json::from_str(
            r#"{"metadata":{},"items":[{"metadata":{"name":"hello-1","namespace":"argo"},"status":{"phase":"Running"}}]}"#,
        )
        .unwrap();
        let items = listed.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].metadata.name, "hello-1");
        assert_eq!(items[0].phase(), Some(WorkflowPhase::Running));

        let empty: ResourceList<WorkflowTemplate> = serde_json::from_str(r#"{"metadata":{}}"#).unwrap();
        assert!(empty.into_items().is_empty());
    }

    #[test]
    fn metadata_uses_camel_case_keys() {
        let meta: ObjectMeta =
            serde_json::from_str(r#"{"name":"a","namespace":"argo","creationTimestamp":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(meta.creation_timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
        let encoded = serde_json::to_value(ObjectMeta::named("a", "argo")).unwrap();
        assert!(encoded.get("creationTimestamp").is_none());
    }
}
