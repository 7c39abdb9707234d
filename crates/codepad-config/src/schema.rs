use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::json;

use crate::CodepadConfig;

/// JSON schema for `codepad.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(CodepadConfig);
    schema.schema.metadata().description =
        Some("Configuration of the code pad expression analyser.".to_owned());
    schema
        .schema
        .extensions
        .insert("examples".to_owned(), json!([{ "analysis": { "source": "1.8" } }]));
    schema
}
