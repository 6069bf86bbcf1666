#[cfg(test)]
#[path = "reply_test.rs"]
mod tests;

use serde_json::Value;

pub const RAG_ANNOTATION: &str = "\n\n*Answer based on your uploaded document*";
pub const GENERAL_ANNOTATION: &str = "\n\n*General AI response*";
const EMPTY_REPLY_PLACEHOLDER: &str = "[No response]";

/// Compatibility shim for the server's inconsistent reply contract: `response`
/// is usually a plain string but sometimes a structured object. The fallback
/// order is fixed and load bearing: a `result` string field wins, then the
/// first string-valued field in the object's own key order, then a
/// placeholder.
pub fn extract_text(response: &Value) -> String {
    match response {
        Value::String(text) => return text.to_string(),
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("result") {
                return text.to_string();
            }

            for value in map.values() {
                if let Value::String(text) = value {
                    return text.to_string();
                }
            }

            return EMPTY_REPLY_PLACEHOLDER.to_string();
        }
        _ => return EMPTY_REPLY_PLACEHOLDER.to_string(),
    }
}

/// Appends the human-readable note telling the user whether an assistant
/// answer came from their uploaded document or from general knowledge. An
/// absent or unknown source tag adds nothing.
pub fn annotate_source(text: &str, source: Option<&str>) -> String {
    match source {
        Some("rag") => return format!("{text}{RAG_ANNOTATION}"),
        Some("general") => return format!("{text}{GENERAL_ANNOTATION}"),
        _ => return text.to_string(),
    }
}
