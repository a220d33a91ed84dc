//! Integration Tests for the explanation service
//!
//! Trains a small pipeline in memory and checks rankings, truncation,
//! lookups and the attribution's local accuracy end to end.

#[cfg(test)]
mod integration_tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use tempfile::tempdir;

    use crate::constants::{GLOBAL_TOP_K, LOCAL_TOP_K};
    use crate::error::{CoreError, ErrorKind};
    use crate::logic::config::ServiceConfig;
    use crate::logic::dataset::DatasetStore;
    use crate::logic::explain::{aggregate, ExplanationService, RiskLevel};
    use crate::logic::features::FeatureMapping;
    use crate::logic::model::TreeConfig;
    use crate::logic::pipeline::train;
    use crate::logic::schema::{CellValue, RawRow};

    const HEADER: &str = "Age;Course;Gender;Target";
    const ROWS: &[&str] = &[
        "18;Nursing;0;Graduate",
        "19;Nursing;1;Graduate",
        "20;Design;0;Enrolled",
        "21;Design;1;Enrolled",
        "30;Nursing;1;Dropout",
        "35;Design;0;Dropout",
        "22;Nursing;0;Graduate",
        "33;Design;1;Dropout",
    ];

    fn sample_store() -> DatasetStore {
        let split = |line: &str| line.split(';').map(str::to_string).collect::<Vec<_>>();
        DatasetStore::from_rows(split(HEADER), ROWS.iter().map(|&r| split(r)).collect())
    }

    fn sample_service() -> ExplanationService {
        let store = sample_store();
        let pipeline = train(&store, &["Gender"], &TreeConfig::default()).unwrap();
        ExplanationService::from_parts(pipeline, store).unwrap()
    }

    fn write_dataset(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("data.csv");
        let mut body = format!("{HEADER}\n");
        for row in ROWS {
            body.push_str(row);
            body.push('\n');
        }
        std::fs::write(&path, body).unwrap();
        path
    }

    // ========================================================================
    // GLOBAL
    // ========================================================================

    #[test]
    fn test_global_covers_every_mapped_feature() {
        let service = sample_service();
        let global = service.global_explanation();

        assert_eq!(global.len(), 3);
        assert!(global.len() <= GLOBAL_TOP_K);

        // Impurity importances are normalized and non-negative
        let total: f64 = global.iter().map(|e| e.value).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(global.iter().all(|e| e.value >= 0.0));
        assert!(global.windows(2).all(|w| w[0].value.abs() >= w[1].value.abs()));
    }

    #[test]
    fn test_global_is_cached() {
        let service = sample_service();
        assert_eq!(service.global_explanation(), service.global_explanation());
        assert_eq!(service.global_ranking().len(), service.mapping().len());
    }

    // ========================================================================
    // LOCAL
    // ========================================================================

    #[test]
    fn test_local_explains_predicted_class() {
        let service = sample_service();
        let local = service.local_explanation(1).unwrap();

        assert_eq!(local.id, 1);
        assert_eq!(local.prediction, "Graduate");
        assert_eq!(local.risk, RiskLevel::Low);
        assert!(local.contributions.len() <= LOCAL_TOP_K);
        assert_eq!(local.contributions.len(), 3);
    }

    #[test]
    fn test_local_accuracy_for_predicted_class() {
        let service = sample_service();

        for id in 1..=ROWS.len() as u64 {
            let local = service.local_explanation(id).unwrap();
            let ranked = service.local_ranking(id).unwrap();
            let total: f64 = ranked.entries().iter().map(|e| e.value).sum();

            // Training rows land in pure leaves
            assert!(
                (total + local.base_value - 1.0).abs() < 1e-9,
                "student {}: {} + {} != 1",
                id,
                total,
                local.base_value
            );
        }
    }

    #[test]
    fn test_local_unknown_id_is_not_found() {
        let service = sample_service();

        for id in [0, ROWS.len() as u64 + 1, u64::MAX] {
            let err = service.local_explanation(id).unwrap_err();
            assert!(matches!(err, CoreError::RecordNotFound { .. }));
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn test_service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExplanationService>();

        let service = Arc::new(sample_service());
        let expected = service.local_explanation(5).unwrap().contributions;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || service.local_explanation(5).unwrap().contributions)
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    // ========================================================================
    // PREDICTION & STUDENTS
    // ========================================================================

    #[test]
    fn test_predict_tolerates_missing_columns() {
        let service = sample_service();

        let mut row = RawRow::new();
        row.insert("Course".into(), CellValue::from("Design"));
        row.insert("Gender".into(), CellValue::Missing);

        let predicted = service.predict(&[row]).unwrap();
        assert_eq!(predicted.len(), 1);
        assert!(["Dropout", "Enrolled", "Graduate"].contains(&predicted[0].as_str()));
    }

    #[test]
    fn test_predict_bad_numeric_is_computation_error() {
        let service = sample_service();

        let mut row = RawRow::new();
        row.insert("Age".into(), CellValue::from("nineteen"));

        let err = service.predict(&[row]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_students_filter_and_limit() {
        let service = sample_service();

        let high: Vec<u64> = service
            .students(None, Some(RiskLevel::High))
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(high, vec![5, 6, 8]);

        assert_eq!(service.students(Some(2), None).len(), 2);
        assert_eq!(service.students(None, None).len(), ROWS.len());

        let third = service.student(3).unwrap();
        assert_eq!(third.prediction, "Enrolled");
        assert_eq!(third.risk, RiskLevel::Medium);
        assert_eq!(third.actual.as_deref(), Some("Enrolled"));
        assert!(service.student(42).unwrap_err().is_not_found());
    }

    #[test]
    fn test_model_info() {
        let service = sample_service();
        let info = service.model_info();

        assert_eq!(info.classes, vec!["Dropout", "Enrolled", "Graduate"]);
        assert_eq!(info.layout.feature_count, 3);
        assert_eq!(info.layout.transformed_count, 4);
        assert_eq!(info.transformed_features.len(), 4);
        assert!(info.dropped_positions.is_empty());
        assert_eq!(info.n_records, ROWS.len());
    }

    // ========================================================================
    // INIT
    // ========================================================================

    #[test]
    fn test_init_trains_then_reloads() {
        let dir = tempdir().unwrap();
        let config = ServiceConfig {
            data_path: write_dataset(dir.path()),
            model_path: dir.path().join("model_pipeline.json"),
            sensitive_features: vec!["Gender".into()],
            ..ServiceConfig::default()
        };

        let first = ExplanationService::init(&config).unwrap();
        assert!(config.model_path.exists());

        let second = ExplanationService::init(&config).unwrap();
        assert_eq!(first.global_ranking().names(), second.global_ranking().names());
        assert_eq!(
            first.model_info().trained_at,
            second.model_info().trained_at
        );
    }

    #[test]
    fn test_init_missing_dataset_is_fatal() {
        let dir = tempdir().unwrap();
        let config = ServiceConfig {
            data_path: dir.path().join("absent.csv"),
            model_path: dir.path().join("model_pipeline.json"),
            ..ServiceConfig::default()
        };

        let err = ExplanationService::init(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Initialization);
    }

    #[test]
    fn test_dataset_missing_declared_column() {
        let pipeline = train(&sample_store(), &["Gender"], &TreeConfig::default()).unwrap();
        let reduced = DatasetStore::from_rows(
            vec!["Age".into(), "Course".into(), "Target".into()],
            vec![vec!["19".into(), "Nursing".into(), "Graduate".into()]],
        );

        let service = ExplanationService::from_parts(pipeline, reduced).unwrap();
        assert_eq!(service.record_count(), 1);
        assert!(service.local_explanation(1).is_ok());
    }

    #[test]
    fn test_tampered_tree_is_initialization_error() {
        let pipeline = train(&sample_store(), &["Gender"], &TreeConfig::default()).unwrap();
        let mut value = serde_json::to_value(&pipeline).unwrap();
        value["classifier"]["nodes"][0]["Split"]["left"] = serde_json::json!(999);
        let tampered = serde_json::from_value(value).unwrap();

        let err = ExplanationService::from_parts(tampered, sample_store())
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::InvalidTree { .. }));
        assert_eq!(err.kind(), ErrorKind::Initialization);
    }

    // ========================================================================
    // AGGREGATION PROPERTIES
    // ========================================================================

    fn course_mapping() -> FeatureMapping {
        FeatureMapping::from_raw_names(
            &["num__Age", "cat__Course_33", "cat__Course_9", "remainder__Gender"],
            &["Age", "Course", "Gender"],
        )
    }

    proptest! {
        /// aggregate(v1 + v2) == aggregate(v1) + aggregate(v2) per feature
        #[test]
        fn prop_aggregation_linear(
            v1 in prop::collection::vec(-100.0f64..100.0, 4),
            v2 in prop::collection::vec(-100.0f64..100.0, 4),
        ) {
            let mapping = course_mapping();
            let sum: Vec<f64> = v1.iter().zip(&v2).map(|(a, b)| a + b).collect();

            let a = aggregate(&v1, &mapping).unwrap();
            let b = aggregate(&v2, &mapping).unwrap();
            let ab = aggregate(&sum, &mapping).unwrap();

            for name in ["Age", "Course", "Gender"] {
                let lhs = ab.value_of(name).unwrap();
                let rhs = a.value_of(name).unwrap() + b.value_of(name).unwrap();
                prop_assert!((lhs - rhs).abs() < 1e-9, "{}: {} vs {}", name, lhs, rhs);
            }
        }

        /// Re-invoking with the same input returns the same order
        #[test]
        fn prop_ranking_deterministic(values in prop::collection::vec(-5i32..5, 4)) {
            // Small integers force frequent ties
            let values: Vec<f64> = values.into_iter().map(f64::from).collect();
            let mapping = course_mapping();

            let first = aggregate(&values, &mapping).unwrap();
            let second = aggregate(&values, &mapping).unwrap();
            prop_assert_eq!(first.names(), second.names());
        }

        /// Truncation never exceeds K and returns everything when fewer are mapped
        #[test]
        fn prop_top_k_bounded(n in 0usize..30) {
            let names: Vec<String> = (0..n).map(|i| format!("num__f{i}")).collect();
            let originals: Vec<String> = (0..n).map(|i| format!("f{i}")).collect();
            let mapping = FeatureMapping::from_raw_names(&names, &originals);
            let values: Vec<f64> = (0..n).map(|i| i as f64).collect();

            let ranked = aggregate(&values, &mapping).unwrap();
            prop_assert_eq!(ranked.top(GLOBAL_TOP_K).len(), n.min(GLOBAL_TOP_K));
            prop_assert_eq!(ranked.top(LOCAL_TOP_K).len(), n.min(LOCAL_TOP_K));
        }
    }
}
