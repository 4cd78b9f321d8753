//! Model and configuration persistence tests.

use oner::*;
use tempfile::TempDir;

mod common;
use common::*;

#[test]
fn test_model_file_round_trip() {
    let data = separated_classes(20, 17);
    let config = ConfigBuilder::new().optimal(OptimalMethod::Infogain).build().unwrap();
    let model = one_r(&data, Some("class"), &config).unwrap();
    let expected = model.predict(&data, PredictionType::Class).unwrap().into_inner();

    let dir = TempDir::new().unwrap();
    for name in ["model.json", "model.bin"] {
        let path = dir.path().join(name);
        model.save_to_file(&path).unwrap();
        let restored = Model::load_from_file(&path).unwrap();

        assert_eq!(restored.feature(), model.feature());
        assert_eq!(restored.rules(), model.rules());
        assert_eq!(restored.discretization(), model.discretization());
        assert_eq!(
            restored.predict(&data, PredictionType::Class).unwrap().into_inner(),
            expected
        );
    }
}

#[test]
fn test_model_json_names_fields() {
    let model = one_r(&two_level_table(), None, &OneRConfig::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
    for field in ["target", "feature", "rules", "contingency", "correct", "total"] {
        assert!(json.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(json["correct"], 5);
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new()
        .ties_method(TiesMethod::Chisq)
        .missing(MissingPolicy::Keep)
        .optimal(OptimalMethod::Logreg)
        .max_levels(10)
        .build()
        .unwrap();

    let path = dir.path().join(oner::config::DEFAULT_CONFIG_FILE);
    config.save_to_file(&path).unwrap();
    let loaded = OneRConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    std::fs::write(&path, "ties_method = \"chisq\"\n").unwrap();
    let loaded = OneRConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.ties_method, TiesMethod::Chisq);
    assert_eq!(loaded.preprocessing, PreprocessConfig::default());
}

// The only test in this binary that touches the process environment.
#[test]
fn test_environment_overrides() {
    std::env::set_var("ONER_NBINS", "3");
    std::env::set_var("ONER_BIN_METHOD", "content");
    std::env::set_var("ONER_TIES_METHOD", "chisq");
    std::env::set_var("ONER_VERBOSE", "yes");
    let config = OneRConfig::load_from_environment();

    std::env::set_var("ONER_NBINS", "1");
    let invalid = OneRConfig::load_from_environment();

    for key in ["ONER_NBINS", "ONER_BIN_METHOD", "ONER_TIES_METHOD", "ONER_VERBOSE"] {
        std::env::remove_var(key);
    }

    let config = config.unwrap();
    assert_eq!(config.ties_method, TiesMethod::Chisq);
    assert!(config.verbose);
    assert_eq!(
        config.preprocessing.numeric,
        NumericStrategy::Bin {
            method: BinMethod::Content,
            nbins: 3
        }
    );
    assert!(invalid.is_err());
}
