//! End-to-end pipeline tests
//!
//! Run whole streams through `grep_resources` and check the written output.

use kgrep::{
    grep_resources, DecodeError, GrepError, GrepOptions, GrepStats, LabelSelector, OutputMode,
    Selector,
};

const CONFIGMAP_LIST: &str = include_str!("fixtures/configmap-list.yaml");
const MIXED_STREAM: &str = include_str!("fixtures/mixed-stream.yaml");
const FOLDED_LIST: &str = include_str!("fixtures/folded-list.yaml");

fn grep(input: &str, selector: &Selector, options: GrepOptions) -> (String, GrepStats) {
    let mut out = Vec::new();
    let stats = grep_resources(selector, input.as_bytes(), &mut out, OutputMode::Summary, options)
        .expect("grep should succeed");
    (String::from_utf8(out).expect("summary output is UTF-8"), stats)
}

fn summary(input: &str, selector: &Selector) -> String {
    grep(input, selector, GrepOptions::default()).0
}

#[test]
fn test_configmap_list_summary() {
    assert_eq!(
        summary(CONFIGMAP_LIST, &Selector::default()),
        "ConfigMap/cluster-autoscaler-status.kube-system\n\
         ConfigMap/istio-ca-root-cert.default\n\
         ConfigMap/kube-root-ca.crt.default\n"
    );
}

#[test]
fn test_folded_block_siblings_summary() {
    assert_eq!(
        summary(FOLDED_LIST, &Selector::default()),
        "ConfigMap/before.ops\n\
         ConfigMap/banner.ops\n\
         ConfigMap/trimmed.\n\
         Service/after.ops\n"
    );
}

#[test]
fn test_merge_keys_feed_identity() {
    let input = "\
kind: List
items:
- &base
  kind: X
  metadata: {name: m, namespace: ns}
- <<: *base
";
    assert_eq!(summary(input, &Selector::default()), "X/m.ns\nX/m.ns\n");
}

#[test]
fn test_byte_order_mark_is_ignored() {
    for input in [
        "\u{feff}kind: A\nmetadata:\n  name: a\n",
        "\u{feff}---\nkind: A\nmetadata:\n  name: a\n",
    ] {
        assert_eq!(summary(input, &Selector::default()), "A/a.\n");
    }
}

#[test]
fn test_empty_input_writes_nothing() {
    let (out, stats) = grep("", &Selector::default(), GrepOptions::default());
    assert!(out.is_empty());
    assert_eq!(stats, GrepStats::default());
}

#[test]
fn test_list_with_n_items_gives_n_lines() {
    let mut input = String::from("apiVersion: v1\nkind: List\nitems:\n");
    for i in 0..25 {
        input.push_str(&format!(
            "- kind: Pod\n  metadata:\n    name: pod-{}\n    namespace: ns\n",
            i
        ));
    }

    let out = summary(&input, &Selector::default());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 25);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(*line, format!("Pod/pod-{}.ns", i));
    }
}

#[test]
fn test_missing_namespace_renders_empty_segment() {
    let out = summary(
        "kind: ClusterRole\nmetadata:\n  name: admin\n",
        &Selector::default(),
    );
    assert_eq!(out, "ClusterRole/admin.\n");
}

#[test]
fn test_missing_everything_renders_degenerate_line() {
    assert_eq!(summary("foo: bar\n", &Selector::default()), "/.\n");
}

#[test]
fn test_runs_are_idempotent() {
    let selector = Selector::builder()
        .labels(LabelSelector::parse("app").unwrap())
        .build()
        .unwrap();
    let first = summary(MIXED_STREAM, &selector);
    let second = summary(MIXED_STREAM, &selector);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_empty_selector_matches_all_flattened_resources() {
    let (out, stats) = grep(MIXED_STREAM, &Selector::default(), GrepOptions::default());
    assert_eq!(stats.resources, 5);
    assert_eq!(stats.matched, stats.resources);
    assert_eq!(out.lines().count(), 5);
}

#[test]
fn test_selector_dimensions() {
    let selector = Selector::builder()
        .kind("ConfigMap")
        .namespace("default")
        .build()
        .unwrap();
    assert_eq!(
        summary(CONFIGMAP_LIST, &selector),
        "ConfigMap/istio-ca-root-cert.default\nConfigMap/kube-root-ca.crt.default\n"
    );

    let selector = Selector::builder()
        .labels(LabelSelector::parse("istio.io/config=true").unwrap())
        .build()
        .unwrap();
    assert_eq!(
        summary(CONFIGMAP_LIST, &selector),
        "ConfigMap/istio-ca-root-cert.default\n"
    );
}

#[test]
fn test_zero_matches_is_success() {
    let selector = Selector::builder().kind("Pod").build().unwrap();
    let (out, stats) = grep(CONFIGMAP_LIST, &selector, GrepOptions::default());
    assert!(out.is_empty());
    assert_eq!(stats.matched, 0);
    assert_eq!(stats.resources, 3);
}

#[test]
fn test_invert_match() {
    let selector = Selector::builder().namespace("default").build().unwrap();
    let options = GrepOptions {
        invert_match: true,
        ..Default::default()
    };
    let (out, _) = grep(CONFIGMAP_LIST, &selector, options);
    assert_eq!(out, "ConfigMap/cluster-autoscaler-status.kube-system\n");
}

#[test]
fn test_omit_kind() {
    let options = GrepOptions {
        omit_kind: true,
        ..Default::default()
    };
    let (out, _) = grep(CONFIGMAP_LIST, &Selector::default(), options);
    assert_eq!(
        out,
        "cluster-autoscaler-status.kube-system\nistio-ca-root-cert.default\nkube-root-ca.crt.default\n"
    );
}

#[test]
fn test_decode_error_keeps_earlier_output() {
    let input = "kind: A\nmetadata:\n  name: a\n---\nkind: [broken\n---\nkind: C\n";
    let mut out = Vec::new();
    let err = grep_resources(
        &Selector::default(),
        input.as_bytes(),
        &mut out,
        OutputMode::Summary,
        GrepOptions::default(),
    )
    .unwrap_err();

    assert_eq!(String::from_utf8(out).unwrap(), "A/a.\n");
    match err {
        GrepError::Decode(DecodeError::Syntax { document, line, .. }) => {
            assert_eq!(document, 2);
            assert!(line >= 4);
        }
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[test]
fn test_yaml_output_is_a_valid_stream() {
    let mut yaml = Vec::new();
    grep_resources(
        &Selector::default(),
        CONFIGMAP_LIST.as_bytes(),
        &mut yaml,
        OutputMode::Yaml,
        GrepOptions::default(),
    )
    .unwrap();

    let yaml = String::from_utf8(yaml).unwrap();
    assert_eq!(
        summary(&yaml, &Selector::default()),
        summary(CONFIGMAP_LIST, &Selector::default())
    );
}
