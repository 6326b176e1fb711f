// Label extraction from raw model output.
//
// Models decorate their answers with commentary around the requested
// JSON, quotation marks and leading blank lines. Extraction never fails;
// the worst case is a noisy or empty string, which the caller gets to judge.

use serde_json::Value;

use crate::prompt::PromptStyle;

/// Extract the label from one raw model output.
pub fn extract_label(raw: &str, style: PromptStyle) -> String {
    match style {
        PromptStyle::Json | PromptStyle::JsonRoles => extract_json_label(raw),
        PromptStyle::Plain => extract_plain_label(raw),
    }
}

/// Parse the output as JSON and read the `label` field. Falls back to the
/// trimmed raw text when the output isn't the JSON we asked for.
fn extract_json_label(raw: &str) -> String {
    if let Some(label) = json_label(raw.trim()) {
        return label;
    }
    // Some models wrap the object in commentary; retry on the outermost
    // brace-delimited slice before giving up.
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Some(label) = json_label(&raw[start..=end]) {
                return label;
            }
        }
    }
    raw.trim().to_string()
}

fn json_label(candidate: &str) -> Option<String> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    value
        .get("label")
        .and_then(Value::as_str)
        .map(|label| label.trim().to_string())
}

/// First non-empty line, stripped of whitespace and surrounding quotes.
fn extract_plain_label(raw: &str) -> String {
    raw.lines()
        .map(|line| line.trim().trim_matches(['"', '\'']).trim())
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
