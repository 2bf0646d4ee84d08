#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn defaults_match_constants() {
    let config = CanvasConfig::default();
    assert_eq!(config.storage_key, "ShapesData");
    assert_eq!(config.background_url.as_deref(), Some("assets/room.svg"));
    assert_eq!(config.stroke_color, "#000000");
    assert_eq!(config.fill_color, "#FF0000");
    assert_eq!(config.zoom_step, 1.05);
    assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
}

#[test]
fn default_config_is_valid() {
    assert!(CanvasConfig::default().validate().is_ok());
}

#[test]
fn empty_object_yields_defaults() {
    assert_eq!(CanvasConfig::from_json("{}").unwrap(), CanvasConfig::default());
}

#[test]
fn partial_object_overrides_named_fields() {
    let config = CanvasConfig::from_json(r##"{"storage_key":"floorplan","fill_color":"#00FF00","zoom_step":1.25}"##).unwrap();
    assert_eq!(config.storage_key, "floorplan");
    assert_eq!(config.fill_color, "#00FF00");
    assert_eq!(config.zoom_step, 1.25);
    assert_eq!(config.stroke_color, "#000000");
}

#[test]
fn null_background_disables_it() {
    let config = CanvasConfig::from_json(r#"{"background_url":null}"#).unwrap();
    assert!(config.background_url.is_none());
}

#[test]
fn malformed_json_is_config_error() {
    let err = CanvasConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, CanvasError::Config(_)));
}

#[test]
fn zoom_step_must_exceed_one() {
    for raw in [r#"{"zoom_step":1.0}"#, r#"{"zoom_step":0.5}"#, r#"{"zoom_step":-2}"#] {
        let err = CanvasConfig::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("zoom_step"), "{raw}: {err}");
    }
}

#[test]
fn empty_storage_key_is_rejected() {
    let err = CanvasConfig::from_json(r#"{"storage_key":"  "}"#).unwrap_err();
    assert!(err.to_string().contains("storage_key"));
}

#[test]
fn log_level_parses_case_insensitively() {
    let config = CanvasConfig::from_json(r#"{"log_level":"DEBUG"}"#).unwrap();
    assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
}

#[test]
fn unknown_log_level_is_rejected() {
    let err = CanvasConfig::from_json(r#"{"log_level":"chatty"}"#).unwrap_err();
    assert!(err.to_string().contains("log_level"));
}
