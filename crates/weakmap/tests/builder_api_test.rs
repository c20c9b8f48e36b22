//! Integration tests for the MapBuilder API
//!
//! These tests drive the public API end to end: parse, build, render.

use weakmap::{
    MapBuilder, WeakmapError,
    config::AppConfig,
    diagnostic::{Diagnostic, RescueReason},
    scope::TopicScope,
};

const SAMPLE: &str = r#"[
    {"id": "n1", "name": "整数・小数・分数", "mastery": 82, "questionCount": 31, "dependencies": ["n2", "n3"]},
    {"id": "n2", "name": "割合", "mastery": 58, "questionCount": 24, "prerequisites": ["n1"]},
    {"id": "n3", "name": "比", "mastery": 64, "prerequisites": ["n1"]},
    {"id": "n4", "name": "速さ", "mastery": 71, "prerequisites": ["n2", "n3"]},
    {"id": "n5", "name": "旅人算", "mastery": 45, "prerequisites": ["速さ"]}
]"#;

#[test]
fn test_builder_api_exists() {
    let _builder = MapBuilder::default();
}

#[test]
fn test_parse_and_build_sample() {
    let builder = MapBuilder::default();
    let topics = builder.parse(SAMPLE).expect("Failed to parse sample");
    let map = builder.build(&topics);

    assert_eq!(map.layer_of("n1"), Some(0));
    assert_eq!(map.layer_of("n2"), Some(1));
    assert_eq!(map.layer_of("n3"), Some(1));
    assert_eq!(map.layer_of("n4"), Some(2));
    assert_eq!(map.layer_of("n5"), Some(3));
    assert!(map.diagnostics().is_empty(), "{:?}", map.diagnostics());
}

#[test]
fn test_render_svg() {
    let builder = MapBuilder::default();
    let topics = builder.parse(SAMPLE).expect("Failed to parse sample");
    let map = builder.build(&topics);

    let svg = builder.render_svg(&map).expect("Failed to render");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("旅人算"));
}

#[test]
fn test_render_json() {
    let builder = MapBuilder::default();
    let topics = builder.parse(SAMPLE).expect("Failed to parse sample");
    let map = builder.build(&topics);

    let json = builder.render_json(&map).expect("Failed to render");
    let doc: serde_json::Value = serde_json::from_str(&json).expect("Output should be JSON");
    assert_eq!(doc["nodes"].as_array().map(Vec::len), Some(5));
    assert_eq!(doc["edges"].as_array().map(Vec::len), Some(5));
}

#[test]
fn test_parse_invalid_json_returns_error() {
    let result = MapBuilder::default().parse("this is not json");
    assert!(matches!(result, Err(WeakmapError::Input { .. })));
}

#[test]
fn test_empty_input_renders_empty_canvas() {
    let builder = MapBuilder::default();
    let topics = builder.parse("[]").expect("Failed to parse");
    let map = builder.build(&topics);

    assert_eq!(map.nodes().count(), 0);
    assert!(builder.render_svg(&map).is_ok());
}

#[test]
fn test_cyclic_input_still_renders() {
    let source = r#"{"topics": [
        {"id": "a", "name": "A", "prerequisites": ["c"]},
        {"id": "b", "name": "B", "prerequisites": ["a"]},
        {"id": "c", "name": "C", "prerequisites": ["b"]}
    ]}"#;
    let builder = MapBuilder::default();
    let topics = builder.parse(source).expect("Failed to parse");
    let map = builder.build(&topics);

    assert_eq!(map.nodes().count(), 3);
    assert!(map.diagnostics().iter().any(|d| matches!(
        d,
        Diagnostic::LayerRescue {
            reason: RescueReason::NoRoots,
            ..
        }
    )));
    assert!(map.diagnostics().iter().any(|d| matches!(d, Diagnostic::Cycle { members } if members.len() == 3)));
    assert!(builder.render_svg(&map).is_ok());
}

#[test]
fn test_scoped_builder() {
    let source = r#"[
        {"id": "s1", "name": "回路", "subject": "science", "domain": "エネルギー"},
        {"id": "s2", "name": "電流", "subject": "science", "domain": "エネルギー", "prerequisites": "回路"},
        {"id": "s3", "name": "植物", "subject": "science", "domain": "生命"},
        {"id": "m1", "name": "割合", "subject": "math"}
    ]"#;
    let builder = MapBuilder::new(AppConfig::default())
        .with_scope(TopicScope::new().with_subject("science").with_domain("エネルギー"));
    let topics = builder.parse(source).expect("Failed to parse");
    let map = builder.build(&topics);

    assert_eq!(map.topics().len(), 2);
    assert_eq!(map.layer_of("s2"), Some(1));
}

#[test]
fn test_builder_reusability() {
    let builder = MapBuilder::default();

    let first = builder.build(&builder.parse(SAMPLE).expect("Failed to parse"));
    let second = builder.build(&builder.parse(r#"[{"id": "x", "name": "X"}]"#).expect("Failed to parse"));

    assert_eq!(first.topics().len(), 5);
    assert_eq!(second.topics().len(), 1);
}
