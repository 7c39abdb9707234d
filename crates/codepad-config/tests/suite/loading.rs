use std::io::Write;

use codepad_config::{CodepadConfig, ConfigError};
use codepad_syntax::JavaLanguageLevel;
use pretty_assertions::assert_eq;

#[test]
fn empty_document_uses_defaults() {
    let config = CodepadConfig::load_from_str("").unwrap();
    assert_eq!(config, CodepadConfig::default());
    assert_eq!(config.analysis.source, "1.8");
    assert_eq!(config.analysis.package_scope, "");
    assert_eq!(config.analysis.max_lub_depth, 32);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.stderr);
    assert!(!config.logging.json);
    assert_eq!(config.language_level(), JavaLanguageLevel::JAVA_8);
}

#[test]
fn analysis_section_is_read() {
    let config = CodepadConfig::load_from_str(
        r#"
[analysis]
source = "1.4"
package_scope = "com.example"
max_lub_depth = 8
"#,
    )
    .unwrap();
    assert_eq!(config.language_level(), JavaLanguageLevel::JAVA_1_4);
    assert_eq!(config.analysis.package_scope, "com.example");
    assert_eq!(config.analysis.max_lub_depth, 8);
}

#[test]
fn plain_major_versions_are_accepted() {
    let config = CodepadConfig::load_from_str("[analysis]\nsource = \"17\"\n").unwrap();
    assert_eq!(config.language_level(), JavaLanguageLevel::new(17));
}

#[test]
fn invalid_source_level_is_rejected() {
    let err = CodepadConfig::load_from_str("[analysis]\nsource = \"banana\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("banana")), "{err}");
}

#[test]
fn zero_lub_depth_is_rejected() {
    let err = CodepadConfig::load_from_str("[analysis]\nmax_lub_depth = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn malformed_package_scope_is_rejected() {
    let err =
        CodepadConfig::load_from_str("[analysis]\npackage_scope = \"com..x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = CodepadConfig::load_from_str("[analysis]\nsauce = \"1.8\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(ref msg) if msg.contains("sauce")), "{err}");

    let err = CodepadConfig::load_from_str("[extras]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = \"debug\"\njson = true").unwrap();

    let config = CodepadConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert_eq!(config.analysis, Default::default());
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("codepad.toml");
    let err = CodepadConfig::load_from_path(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn tracing_init_is_idempotent() {
    let config = CodepadConfig::default();
    codepad_config::init_tracing(&config.logging);
    codepad_config::init_tracing(&config.logging);
    tracing::info!("still alive");
}
