use std::fs;

use crate::config::{
    NamedExportsConfig, discover_config_path, find_project_root, load_config,
    load_config_from_path,
};
use crate::error::NamedExportsError;

#[test]
fn defaults_enable_maps_and_default_require_collapsing() {
    let config = NamedExportsConfig::default();
    assert!(config.source_map);
    assert!(config.default_requires);
    assert!(!config.hires);
    assert!(config.include.is_empty() && config.exclude.is_empty());
}

#[test]
fn project_root_is_the_nearest_package_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("packages/app/src");
    fs::create_dir_all(&nested).expect("mkdir");
    fs::write(dir.path().join("packages/app/package.json"), "{}").expect("write");

    assert_eq!(find_project_root(&nested), dir.path().join("packages/app"));
}

#[test]
fn json5_config_accepts_comments_and_trailing_commas() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("named-exports.config.json5"),
        "{\n  // only app code\n  include: ['src/**'],\n  hires: true,\n}\n",
    )
    .expect("write");

    let config = load_config(dir.path()).expect("config");

    assert_eq!(config.include, vec!["src/**".to_string()]);
    assert!(config.hires);
    assert!(config.source_map);
}

#[test]
fn toml_config_accepts_snake_case_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("named-exports.toml");
    fs::write(
        &path,
        "source_map = false\ndefault_requires = false\nexternal = [\"react\"]\n",
    )
    .expect("write");

    let config = load_config_from_path(&path).expect("config");

    assert!(!config.source_map);
    assert!(!config.default_requires);
    assert_eq!(config.external, vec!["react".to_string()]);
}

#[test]
fn yaml_rc_file_is_discovered() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(".namedexportsrc.yml"),
        "exclude:\n  - \"**/*.spec.js\"\nsourceMap: false\n",
    )
    .expect("write");

    assert_eq!(
        discover_config_path(dir.path()),
        Some(dir.path().join(".namedexportsrc.yml"))
    );
    let config = load_config(dir.path()).expect("config");
    assert_eq!(config.exclude, vec!["**/*.spec.js".to_string()]);
    assert!(!config.source_map);
}

#[test]
fn dedicated_file_wins_over_package_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "app", "namedExports": { "hires": true } }"#,
    )
    .expect("write");
    fs::write(dir.path().join("named-exports.config.json"), r#"{ "hires": false }"#)
        .expect("write");

    assert!(!load_config(dir.path()).expect("config").hires);
}

#[test]
fn package_json_section_is_used_without_a_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "app", "namedExports": { "external": ["vue"], "hires": true } }"#,
    )
    .expect("write");

    let config = load_config(dir.path()).expect("config");

    assert_eq!(config.external, vec!["vue".to_string()]);
    assert!(config.hires);
}

#[test]
fn missing_config_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("package.json"), r#"{ "name": "app" }"#).expect("write");

    assert_eq!(
        load_config(dir.path()).expect("config"),
        NamedExportsConfig::default()
    );
}

#[test]
fn malformed_config_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("named-exports.config.yaml");
    fs::write(&path, "include: [unterminated\n").expect("write");

    let err = load_config_from_path(&path).expect_err("malformed");
    assert!(matches!(err, NamedExportsError::ConfigParse { .. }));
}
