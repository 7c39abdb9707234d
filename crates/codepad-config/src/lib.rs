//! Configuration for the code pad analyser.
//!
//! Loaded from a `codepad.toml` file:
//!
//! ```toml
//! [analysis]
//! source = "1.8"
//! package_scope = "com.example"
//!
//! [logging]
//! level = "debug"
//! json = false
//! ```

use std::path::Path;
use std::sync::Once;

use codepad_syntax::JavaLanguageLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod schema;

pub use schema::json_schema;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct CodepadConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings that affect how commands are typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Java source level, either `1.x` or a plain major version. Levels below 5 use
    /// the pre-generics conditional operator rules.
    #[serde(default = "AnalysisConfig::default_source")]
    pub source: String,

    /// Package whose classes are visible by simple name. Empty for the default
    /// package.
    #[serde(default)]
    pub package_scope: String,

    /// Nesting limit for least-upper-bound computation over recursive generic types.
    #[serde(default = "AnalysisConfig::default_max_lub_depth")]
    #[schemars(range(min = 1))]
    pub max_lub_depth: usize,
}

impl AnalysisConfig {
    fn default_source() -> String {
        "1.8".to_owned()
    }

    fn default_max_lub_depth() -> usize {
        32
    }

    /// The configured source level.
    pub fn language_level(&self) -> Result<JavaLanguageLevel, ConfigError> {
        self.source
            .parse()
            .map_err(|err: codepad_syntax::InvalidLanguageLevel| {
                ConfigError::Invalid(format!("analysis.source: {err}"))
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.language_level()?;
        if self.max_lub_depth == 0 {
            return Err(ConfigError::Invalid(
                "analysis.max_lub_depth must be at least 1".to_owned(),
            ));
        }
        if !self.package_scope.is_empty() && !is_package_name(&self.package_scope) {
            return Err(ConfigError::Invalid(format!(
                "analysis.package_scope: `{}` is not a package name",
                self.package_scope
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: Self::default_source(),
            package_scope: String::new(),
            max_lub_depth: Self::default_max_lub_depth(),
        }
    }
}

fn is_package_name(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}

/// Logging settings for the analyser's `tracing` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Either a plain level (`trace`, `debug`, `info`, `warn`, `error`) or an
    /// `EnvFilter` directive string such as `codepad_eval=trace,info`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,

    /// Write to stderr. When false, log output is discarded.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured directives, with `RUST_LOG` merged in
    /// when it is set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Toml(value.message().to_owned())
    }
}

impl CodepadConfig {
    /// Parses and validates a TOML document.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: CodepadConfig = toml::from_str(text)?;
        config.analysis.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(path = %path.display(), source = %config.analysis.source, "loaded config");
        Ok(config)
    }

    /// The configured source level. Always valid for a config obtained through one of
    /// the loaders; falls back to the default level otherwise.
    pub fn language_level(&self) -> JavaLanguageLevel {
        self.analysis.language_level().unwrap_or_default()
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber described by `config`.
///
/// Only the first call has an effect; a subscriber installed elsewhere is left alone.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| init_tracing_inner(config));
}

fn init_tracing_inner(config: &LoggingConfig) {
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{Layer, Registry};

    let writer = if !config.stderr {
        BoxMakeWriter::new(std::io::sink)
    } else if cfg!(debug_assertions) {
        // Routes through the test harness capture when running under `cargo test`.
        BoxMakeWriter::new(tracing_subscriber::fmt::TestWriter::with_stderr())
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let filter = config.env_filter();
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    };

    let _ = tracing_subscriber::registry().with(layer).try_init();
}
