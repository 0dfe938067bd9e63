//! Schema validation for Simon JSON5 configuration layers.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &["$schema", "assistant", "llm", "storage", "skills", "executor"],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("assistant") {
        validate_assistant(value, layer, "assistant")?;
    }
    if let Some(value) = map.get("llm") {
        validate_llm(value, layer, "llm")?;
    }
    if let Some(value) = map.get("storage") {
        validate_storage(value, layer, "storage")?;
    }
    if let Some(value) = map.get("skills") {
        validate_skills(value, layer, "skills")?;
    }
    if let Some(value) = map.get("executor") {
        validate_executor(value, layer, "executor")?;
    }
    Ok(())
}

/// Validate the "assistant" block.
fn validate_assistant(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "wake_phrases",
            "filler_words",
            "listen_timeout_secs",
            "wake_phrase_limit_secs",
            "command_phrase_limit_secs",
            "history_limit",
            "stop_timeout_ms",
        ],
        layer,
        path,
    )?;
    for key in ["wake_phrases", "filler_words"] {
        if let Some(value) = map.get(key) {
            validate_string_array(value, layer, &join_path(path, key))?;
        }
    }
    for key in [
        "listen_timeout_secs",
        "wake_phrase_limit_secs",
        "command_phrase_limit_secs",
        "history_limit",
        "stop_timeout_ms",
    ] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

/// Validate the "llm" block.
fn validate_llm(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["endpoint", "model", "temperature", "request_timeout_secs"],
        layer,
        path,
    )?;
    for key in ["endpoint", "model"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("temperature") {
        expect_f64(value, layer, &join_path(path, "temperature"))?;
    }
    if let Some(value) = map.get("request_timeout_secs") {
        expect_u64(value, layer, &join_path(path, "request_timeout_secs"))?;
    }
    Ok(())
}

/// Validate the "storage" block.
fn validate_storage(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["commands_path", "knowledge_path"], layer, path)?;
    for (key, value) in map {
        expect_optional_string(value, layer, &join_path(path, key))?;
    }
    Ok(())
}

/// Validate the "skills" block.
fn validate_skills(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["enabled", "weather", "files"], layer, path)?;
    if let Some(value) = map.get("enabled") {
        validate_string_array(value, layer, &join_path(path, "enabled"))?;
    }
    if let Some(value) = map.get("weather") {
        let weather_path = join_path(path, "weather");
        let weather = expect_object(value, layer, &weather_path)?;
        ensure_allowed_keys(
            weather,
            &["endpoint", "default_location", "timeout_secs"],
            layer,
            &weather_path,
        )?;
        for key in ["endpoint", "default_location"] {
            if let Some(value) = weather.get(key) {
                expect_string(value, layer, &join_path(&weather_path, key))?;
            }
        }
        if let Some(value) = weather.get("timeout_secs") {
            expect_u64(value, layer, &join_path(&weather_path, "timeout_secs"))?;
        }
    }
    if let Some(value) = map.get("files") {
        let files_path = join_path(path, "files");
        let files = expect_object(value, layer, &files_path)?;
        ensure_allowed_keys(files, &["root"], layer, &files_path)?;
        if let Some(value) = files.get("root") {
            expect_optional_string(value, layer, &join_path(&files_path, "root"))?;
        }
    }
    Ok(())
}

/// Validate the "executor" block.
fn validate_executor(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["app_aliases", "screenshot_dir"], layer, path)?;
    if let Some(value) = map.get("app_aliases") {
        let aliases_path = join_path(path, "app_aliases");
        let aliases = expect_object(value, layer, &aliases_path)?;
        for (name, command) in aliases {
            expect_string(command, layer, &join_path(&aliases_path, name))?;
        }
    }
    if let Some(value) = map.get("screenshot_dir") {
        expect_optional_string(value, layer, &join_path(path, "screenshot_dir"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() || value.is_null() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string or null"))
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(entries) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, entry) in entries.iter().enumerate() {
        if !entry.is_string() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Reject keys that are not part of the schema.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
