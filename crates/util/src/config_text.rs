//! Best-effort rendering of a JSON config tree into editable text.
//!
//! The server hands the dashboard its configuration as JSON and takes
//! the edited text back verbatim; parsing the text again is entirely
//! the server's job. This renderer is therefore one-directional
//! convenience, not a serializer: mapping keys become `key: value`
//! lines, nested mappings indent two spaces under a bare `key:` line,
//! sequence items become `- item` lines, and strings render unquoted.
//! Key order follows the JSON document.

use serde_json::Value;

/// Renders a config tree as an indented key/value text block.
pub fn config_to_text(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut lines = Vec::new();
            push_map_lines(&mut lines, map, 0);
            let mut text = lines.join("\n");
            text.push('\n');
            text
        }
        Value::Array(items) => items
            .iter()
            .map(|item| format!("- {}", scalar_text(item)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => scalar_text(other),
    }
}

fn push_map_lines(lines: &mut Vec<String>, map: &serde_json::Map<String, Value>, depth: usize) {
    let pad = "  ".repeat(depth);
    for (key, value) in map {
        match value {
            Value::Object(nested) => {
                lines.push(format!("{pad}{key}:"));
                push_map_lines(lines, nested, depth + 1);
            }
            Value::Array(items) => {
                lines.push(format!("{pad}{key}:"));
                for item in items {
                    lines.push(format!("{pad}  - {}", scalar_text(item)));
                }
            }
            other => lines.push(format!("{pad}{key}: {}", scalar_text(other))),
        }
    }
}

/// Leaf rendering: strings print raw, null prints `null`, containers
/// that appear where a scalar is expected fall back to compact JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        container => serde_json::to_string(container).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_mapping_renders_key_value_lines() {
        let config = json!({
            "headless": true,
            "max_applications": 25,
            "resume": "profiles/default.pdf",
            "proxy": null
        });
        assert_eq!(
            config_to_text(&config),
            "headless: true\nmax_applications: 25\nresume: profiles/default.pdf\nproxy: null\n"
        );
    }

    #[test]
    fn nested_mappings_indent_two_spaces() {
        let config = json!({
            "browser": {
                "engine": "chromium",
                "window": { "width": 1280 }
            }
        });
        assert_eq!(
            config_to_text(&config),
            "browser:\n  engine: chromium\n  window:\n    width: 1280\n"
        );
    }

    #[test]
    fn sequences_render_dashed_items() {
        let config = json!({
            "keywords": ["rust", "backend"],
            "blacklist": []
        });
        assert_eq!(
            config_to_text(&config),
            "keywords:\n  - rust\n  - backend\nblacklist:\n"
        );
    }

    #[test]
    fn sequence_of_mappings_falls_back_to_compact_json() {
        let config = json!({ "accounts": [{ "user": "a" }] });
        assert_eq!(
            config_to_text(&config),
            "accounts:\n  - {\"user\":\"a\"}\n"
        );
    }

    #[test]
    fn top_level_scalars_and_sequences_render_bare() {
        assert_eq!(config_to_text(&json!("just text")), "just text");
        assert_eq!(config_to_text(&json!(null)), "null");
        assert_eq!(config_to_text(&json!(["a", "b"])), "- a\n- b");
    }

    #[test]
    fn key_order_follows_the_document() {
        let config: Value =
            serde_json::from_str(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
        assert_eq!(config_to_text(&config), "zeta: 1\nalpha: 2\nmid: 3\n");
    }
}
