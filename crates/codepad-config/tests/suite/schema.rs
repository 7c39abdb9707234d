use codepad_config::json_schema;

#[test]
fn schema_lists_sections_and_defaults() {
    let schema = serde_json::to_value(json_schema()).unwrap();
    let properties = &schema["properties"];
    assert!(properties.get("analysis").is_some());
    assert!(properties.get("logging").is_some());
    assert_eq!(schema["additionalProperties"], serde_json::Value::Bool(false));

    let analysis = &schema["definitions"]["AnalysisConfig"]["properties"];
    assert_eq!(analysis["source"]["default"], "1.8");
    assert_eq!(analysis["max_lub_depth"]["default"], 32);
    assert_eq!(analysis["max_lub_depth"]["minimum"], 1.0);
}
