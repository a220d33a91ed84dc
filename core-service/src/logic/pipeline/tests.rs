use super::*;
use crate::error::{CoreError, ErrorKind};
use crate::logic::config::ServiceConfig;
use crate::logic::dataset::DatasetStore;
use crate::logic::model::TreeConfig;
use crate::logic::schema::{CellValue, FeatureKind, RawRow};
use tempfile::tempdir;

fn sample_store() -> DatasetStore {
    let header = ["Age", "Course", "Gender", "Target"];
    let rows = [
        ["18", "Nursing", "0", "Graduate"],
        ["19", "Nursing", "1", "Graduate"],
        ["20", "Design", "0", "Enrolled"],
        ["21", "Design", "1", "Enrolled"],
        ["30", "Nursing", "1", "Dropout"],
        ["35", "Design", "0", "Dropout"],
        ["22", "Nursing", "0", "Graduate"],
        ["33", "Design", "1", "Dropout"],
    ];
    DatasetStore::from_rows(
        header.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

fn config_in(dir: &std::path::Path) -> ServiceConfig {
    ServiceConfig {
        data_path: dir.join("data.csv"),
        model_path: dir.join("model_pipeline.json"),
        train_if_missing: true,
        sensitive_features: vec!["Gender".to_string()],
        tree: TreeConfig::default(),
    }
}

#[test]
fn test_infer_schema_kinds_and_defaults() {
    let schema = infer_schema(&sample_store(), &["Gender"]);

    assert_eq!(schema.names(), vec!["Age", "Course", "Gender"]);
    assert_eq!(schema.columns[0].kind, FeatureKind::Numerical);
    assert_eq!(schema.columns[0].default, CellValue::Number(24.75));
    assert_eq!(schema.columns[1].kind, FeatureKind::Categorical);
    assert_eq!(schema.columns[1].default, CellValue::Missing);
    assert_eq!(schema.columns[2].kind, FeatureKind::Passthrough);
    assert_eq!(schema.columns[2].default, CellValue::Number(0.5));
}

#[test]
fn test_infer_schema_nan_text_is_categorical() {
    let store = DatasetStore::from_rows(
        vec!["Grade".into(), "Target".into()],
        vec![
            vec!["NaN".into(), "Graduate".into()],
            vec!["NaN".into(), "Dropout".into()],
        ],
    );
    let schema = infer_schema(&store, &["Gender"]);

    assert_eq!(schema.columns[0].kind, FeatureKind::Categorical);
    assert_eq!(schema.columns[0].default, CellValue::Missing);
}

#[test]
fn test_predict_rejects_infinite_text() {
    let pipeline = train(&sample_store(), &["Gender"], &TreeConfig::default()).unwrap();

    let mut row = RawRow::new();
    row.insert("Age".into(), CellValue::from("inf"));
    let err = pipeline.predict(&[row]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidCell { .. }));
}

#[test]
fn test_train_fits_training_rows() {
    let store = sample_store();
    let pipeline = train(&store, &["Gender"], &TreeConfig::default()).unwrap();

    let names: Vec<String> = pipeline.output_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(
        names,
        vec!["num__Age", "cat__Course_Design", "cat__Course_Nursing", "remainder__Gender"]
    );
    assert_eq!(pipeline.classifier().classes(), &["Dropout", "Enrolled", "Graduate"]);
    assert_eq!(pipeline.metadata().n_training_rows, 8);

    let rows: Vec<RawRow> = store.all().iter().map(|r| r.values.clone()).collect();
    let predicted = pipeline.predict(&rows).unwrap();
    let expected: Vec<String> = store.all().iter().filter_map(|r| r.target.clone()).collect();
    assert_eq!(predicted, expected);
}

#[test]
fn test_predict_fills_absent_columns() {
    let pipeline = train(&sample_store(), &["Gender"], &TreeConfig::default()).unwrap();

    let mut row = RawRow::new();
    row.insert("Age".into(), CellValue::Number(19.0));
    let predicted = pipeline.predict(&[row, RawRow::new()]).unwrap();

    assert_eq!(predicted.len(), 2);
    for label in &predicted {
        assert!(pipeline.classifier().classes().contains(label));
    }
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("model_pipeline.json");
    let pipeline = train(&sample_store(), &["Gender"], &TreeConfig::default()).unwrap();

    pipeline.save(&path).unwrap();
    let loaded = ModelPipeline::load(&path).unwrap();

    assert_eq!(loaded.layout_info().hash, pipeline.layout_info().hash);
    assert_eq!(loaded.classifier().nodes().len(), pipeline.classifier().nodes().len());
    assert_eq!(loaded.metadata().trained_at, pipeline.metadata().trained_at);

    let rows: Vec<RawRow> = sample_store().all().iter().map(|r| r.values.clone()).collect();
    assert_eq!(loaded.predict(&rows).unwrap(), pipeline.predict(&rows).unwrap());
}

#[test]
fn test_load_rejects_edited_schema() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model_pipeline.json");
    train(&sample_store(), &["Gender"], &TreeConfig::default())
        .unwrap()
        .save(&path)
        .unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    value["schema"]["columns"][0]["kind"] = serde_json::json!("passthrough");
    std::fs::write(&path, value.to_string()).unwrap();

    let err = ModelPipeline::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::LayoutMismatch(_)));
    assert_eq!(err.kind(), ErrorKind::Initialization);
}

#[test]
fn test_load_rejects_out_of_range_child() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model_pipeline.json");
    train(&sample_store(), &["Gender"], &TreeConfig::default())
        .unwrap()
        .save(&path)
        .unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    value["classifier"]["nodes"][0]["Split"]["left"] = serde_json::json!(999);
    std::fs::write(&path, value.to_string()).unwrap();

    let err = ModelPipeline::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTree { .. }));
    assert_eq!(err.kind(), ErrorKind::Initialization);
}

#[test]
fn test_load_garbage_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model_pipeline.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(ModelPipeline::load(&path), Err(CoreError::ModelParse { .. })));
}

#[test]
fn test_load_or_train_persists_then_reuses() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let store = sample_store();

    let trained = load_or_train(&config, &store).unwrap();
    assert!(config.model_path.exists());

    let reloaded = load_or_train(&config, &store).unwrap();
    assert_eq!(reloaded.metadata().trained_at, trained.metadata().trained_at);
}

#[test]
fn test_missing_model_with_training_disabled() {
    let dir = tempdir().unwrap();
    let config = ServiceConfig {
        train_if_missing: false,
        ..config_in(dir.path())
    };

    let err = load_or_train(&config, &sample_store()).unwrap_err();
    assert!(matches!(err, CoreError::ModelMissing { .. }));
    assert!(!config.model_path.exists());
}

#[test]
fn test_train_requires_labels() {
    let no_target = DatasetStore::from_rows(vec!["Age".into()], vec![vec!["19".into()]]);
    assert!(matches!(
        train(&no_target, &["Gender"], &TreeConfig::default()),
        Err(CoreError::MissingTargetColumn { .. })
    ));

    let partial = DatasetStore::from_rows(
        vec!["Age".into(), "Target".into()],
        vec![
            vec!["19".into(), "Graduate".into()],
            vec!["20".into(), "".into()],
        ],
    );
    assert!(matches!(
        train(&partial, &["Gender"], &TreeConfig::default()),
        Err(CoreError::MissingTarget { id: 2 })
    ));
}
