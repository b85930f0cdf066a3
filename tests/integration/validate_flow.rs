use schemacheck::domain::config::{ConfigOverrides, ValidationConfiguration};
use schemacheck::domain::document::LoadedDocument;
use schemacheck::domain::report::RunReport;
use schemacheck::engine::{FormatRegistry, compile};
use serde_json::json;

fn integer_x_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {"x": {"type": "integer"}},
        "required": ["x"]
    })
}

#[test]
fn invalid_document_reports_error_referencing_x() {
    let config = ValidationConfiguration::default();
    let compiled =
        compile(&integer_x_schema(), &config, &FormatRegistry::new()).expect("compile");
    let document = LoadedDocument::new("data.yaml", json!({"x": "not a number"}));

    let report = RunReport::from_outcomes(vec![compiled.validate_document(&document)]);
    assert!(!report.valid);
    let errors = report.errors.expect("errors");
    assert_eq!(errors[0].filename, "data.yaml");
    assert!(!errors[0].errors.is_empty());
    assert!(errors[0].errors[0].instance_path.contains('x'));
}

#[test]
fn valid_document_reports_no_errors() {
    let config = ValidationConfiguration::default();
    let compiled =
        compile(&integer_x_schema(), &config, &FormatRegistry::new()).expect("compile");
    let document = LoadedDocument::new("data.yaml", json!({"x": 5}));

    let report = RunReport::from_outcomes(vec![compiled.validate_document(&document)]);
    assert_eq!(report, RunReport::valid());
}

#[test]
fn outcomes_follow_document_order() {
    let config = ConfigOverrides {
        all_errors: Some(true),
        ..ConfigOverrides::default()
    }
    .resolve();
    let compiled =
        compile(&integer_x_schema(), &config, &FormatRegistry::new()).expect("compile");
    let documents = [
        LoadedDocument::new("c.yaml", json!({})),
        LoadedDocument::new("a.yaml", json!({"x": 1})),
        LoadedDocument::new("b.yaml", json!({"x": 1.5})),
    ];

    let outcomes: Vec<_> = documents
        .iter()
        .map(|document| compiled.validate_document(document))
        .collect();
    let report = RunReport::from_outcomes(outcomes);
    let filenames: Vec<_> = report
        .errors
        .expect("errors")
        .into_iter()
        .map(|entry| entry.filename)
        .collect();
    assert_eq!(filenames, vec!["c.yaml", "b.yaml"]);
}

#[test]
fn draft_can_be_pinned() {
    let config = ConfigOverrides {
        draft: Some("4".parse().expect("draft")),
        ..ConfigOverrides::default()
    }
    .resolve();
    // Draft 4 uses boolean exclusiveMaximum.
    let schema = json!({"type": "number", "maximum": 10, "exclusiveMaximum": true});
    let compiled = compile(&schema, &config, &FormatRegistry::new()).expect("compile");

    assert!(compiled.validate(&json!(10)).is_some());
    assert!(compiled.validate(&json!(9)).is_none());
}
