//! Resource field extraction tests
//!
//! Identity fields must degrade to empty values on partial metadata.

use kgrep::resource::{lookup, string_field, ResourceRef};
use serde_yaml::Value;

fn parse(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn test_extract_configmap_identity() {
    let obj = parse(
        r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: kube-root-ca.crt
  namespace: default
  annotations:
    kubernetes.io/description: Contains a CA bundle
"#,
    );

    let resource = ResourceRef::new(&obj);
    assert_eq!(resource.kind(), "ConfigMap");
    assert_eq!(resource.name(), "kube-root-ca.crt");
    assert_eq!(resource.namespace(), "default");
    assert_eq!(
        resource.annotation("kubernetes.io/description"),
        Some("Contains a CA bundle")
    );
}

#[test]
fn test_extract_fields_missing_metadata() {
    let obj = parse("kind: Namespace\n");

    let resource = ResourceRef::new(&obj);
    assert_eq!(resource.name(), "");
    assert_eq!(resource.namespace(), "");
    assert_eq!(resource.labels().count(), 0);
}

#[test]
fn test_extract_fields_null_metadata() {
    let obj = parse("kind: Pod\nmetadata:\n");

    let resource = ResourceRef::new(&obj);
    assert_eq!(resource.kind(), "Pod");
    assert_eq!(resource.name(), "");
    assert_eq!(resource.label("app"), None);
}

#[test]
fn test_extract_fields_wrong_types() {
    let obj = parse("kind: [a, b]\nmetadata:\n  name: {x: 1}\n  labels: [app]\n");

    let resource = ResourceRef::new(&obj);
    assert_eq!(resource.kind(), "");
    assert_eq!(resource.name(), "");
    assert_eq!(resource.labels().count(), 0);
}

#[test]
fn test_non_string_label_values_are_skipped() {
    let obj = parse("metadata:\n  labels:\n    enabled: true\n    app: web\n");

    let resource = ResourceRef::new(&obj);
    assert_eq!(resource.label("enabled"), None);
    assert_eq!(resource.labels().collect::<Vec<_>>(), vec![("app", "web")]);
}

#[test]
fn test_lookup_helpers() {
    let obj = parse("spec:\n  template:\n    metadata:\n      name: inner\n");
    assert_eq!(
        string_field(&obj, &["spec", "template", "metadata", "name"]),
        "inner"
    );
    assert!(lookup(&obj, &["spec", "missing"]).is_none());
}
