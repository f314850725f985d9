//! Collects the REST endpoint handler descriptors recorded on a component model chain.

use crate::application::{
    ComponentModel, REST_ENDPOINT_EVENT_HANDLER_METHODS, REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT,
};
use crate::class_registry::MethodDescriptor;
use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Identifies a handler method by name and ordered parameter type names.
///
/// Equality is structural, so the same handler recorded on two models compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointMethodDescriptor {
    pub name: String,
    #[serde(rename = "parameters")]
    pub parameter_types: Vec<String>,
}

impl EndpointMethodDescriptor {
    pub fn new(name: impl Into<String>, parameter_types: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
        }
    }
}

impl From<&MethodDescriptor> for EndpointMethodDescriptor {
    fn from(method: &MethodDescriptor) -> Self {
        Self::new(method.name.clone(), method.parameter_types())
    }
}

/// Whether the model, or one of its ancestors, is marked as having REST endpoint handlers
pub fn has_rest_endpoint(model: &ComponentModel) -> bool {
    model.meta(REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT) == Some("true")
}

/// Encode descriptors into the meta value format read by [`collect_endpoint_methods`]
pub fn encode_endpoint_methods(methods: &[EndpointMethodDescriptor]) -> Result<String> {
    Ok(serde_json::to_string(methods)?)
}

/// Walk from `model` to the root of its chain, gathering each level's locally declared
/// endpoint descriptors.
///
/// The result is ordered leaf to root; a descriptor structurally equal to one already
/// gathered is skipped, so the most specific declaration wins.
pub fn collect_endpoint_methods(model: &ComponentModel) -> Result<Vec<EndpointMethodDescriptor>> {
    let mut collected: Vec<EndpointMethodDescriptor> = Vec::new();
    let mut current = Some(model);

    while let Some(level) = current {
        if let Some(raw) = level.local_meta(REST_ENDPOINT_EVENT_HANDLER_METHODS) {
            let declared: Vec<EndpointMethodDescriptor> =
                serde_json::from_str(raw).map_err(|e| Error::InvalidMetadata {
                    class: level.component_class().to_string(),
                    message: e.to_string(),
                })?;
            debug!(
                "{} declares {} endpoint handler(s)",
                level.component_class(),
                declared.len()
            );
            for descriptor in declared {
                if !collected.contains(&descriptor) {
                    collected.push(descriptor);
                }
            }
        }
        current = level.parent_model();
    }

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn descriptor(name: &str, types: &[&str]) -> EndpointMethodDescriptor {
        EndpointMethodDescriptor::new(name, types.iter().map(|t| t.to_string()).collect())
    }

    fn model(class: &str, methods: &[EndpointMethodDescriptor]) -> ComponentModel {
        ComponentModel::new(class)
            .with_meta(
                REST_ENDPOINT_EVENT_HANDLER_METHODS,
                encode_endpoint_methods(methods).unwrap(),
            )
            .with_meta(REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT, "true")
    }

    #[test]
    fn test_collects_leaf_to_root() {
        let base = Arc::new(model("Base", &[descriptor("superclassEndpoint", &["java.lang.String"])]));
        let leaf = model("Leaf", &[descriptor("onHttpGet", &["int"])]).with_parent(base);

        let collected = collect_endpoint_methods(&leaf).unwrap();

        assert_eq!(
            collected,
            vec![
                descriptor("onHttpGet", &["int"]),
                descriptor("superclassEndpoint", &["java.lang.String"]),
            ]
        );
    }

    #[test]
    fn test_structural_duplicates_are_collected_once() {
        let shared = descriptor("onHttpGet", &["java.lang.String"]);
        let base = Arc::new(model("Base", &[shared.clone(), descriptor("onHttpPut", &[])]));
        let leaf = model("Leaf", &[shared.clone()]).with_parent(base);

        let collected = collect_endpoint_methods(&leaf).unwrap();

        assert_eq!(collected, vec![shared, descriptor("onHttpPut", &[])]);
    }

    #[test]
    fn test_same_name_different_signature_is_kept() {
        let base = Arc::new(model("Base", &[descriptor("onHttpGet", &["int"])]));
        let leaf = model("Leaf", &[descriptor("onHttpGet", &["long"])]).with_parent(base);

        assert_eq!(collect_endpoint_methods(&leaf).unwrap().len(), 2);
    }

    #[test]
    fn test_levels_without_metadata_contribute_nothing() {
        let root = Arc::new(model("Root", &[descriptor("onHttpHead", &[])]));
        let middle = Arc::new(ComponentModel::new("Middle").with_parent(root));
        let leaf = ComponentModel::new("Leaf").with_parent(middle);

        assert_eq!(
            collect_endpoint_methods(&leaf).unwrap(),
            vec![descriptor("onHttpHead", &[])]
        );
        assert!(has_rest_endpoint(&leaf));
    }

    #[test]
    fn test_model_without_marker_has_no_rest_endpoint() {
        let plain = ComponentModel::new("Plain");
        assert!(!has_rest_endpoint(&plain));

        let marked_false =
            ComponentModel::new("Plain").with_meta(REST_ENDPOINT_EVENT_HANDLER_METHOD_PRESENT, "false");
        assert!(!has_rest_endpoint(&marked_false));
    }

    #[test]
    fn test_malformed_metadata_is_reported() {
        let broken = ComponentModel::new("Broken").with_meta(REST_ENDPOINT_EVENT_HANDLER_METHODS, "{not json");

        let err = collect_endpoint_methods(&broken).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata { ref class, .. } if class == "Broken"));
    }

    #[test]
    fn test_meta_wire_format() {
        let encoded = encode_endpoint_methods(&[descriptor("onHttpGet", &["java.lang.String"])]).unwrap();
        assert_eq!(encoded, r#"[{"name":"onHttpGet","parameters":["java.lang.String"]}]"#);
    }
}
