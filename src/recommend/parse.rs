//! Pulling JSON out of free-form model output.
//!
//! Models often wrap the requested JSON in prose or code fences. The whole
//! output is tried first; failing that, the span between the first opening
//! and last closing delimiter.

use serde::de::DeserializeOwned;

/// Parse the first JSON object found in `output`.
pub fn extract_object<T: DeserializeOwned>(output: &str) -> Option<T> {
    extract_between(output, '{', '}')
}

/// Parse the first JSON array found in `output`.
pub fn extract_array<T: DeserializeOwned>(output: &str) -> Result<T, serde_json::Error> {
    if let Ok(value) = serde_json::from_str(output) {
        return Ok(value);
    }
    let span = span_between(output, '[', ']').unwrap_or("");
    serde_json::from_str(span)
}

fn extract_between<T: DeserializeOwned>(output: &str, open: char, close: char) -> Option<T> {
    let output = output.trim();
    if output.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(output) {
        return Some(value);
    }
    serde_json::from_str(span_between(output, open, close)?).ok()
}

fn span_between(output: &str, open: char, close: char) -> Option<&str> {
    let start = output.find(open)?;
    let end = output.rfind(close)?;
    (end > start).then(|| &output[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_object_plain() {
        let v: Value = extract_object(r#"{"streams": ["Science"]}"#).unwrap();
        assert_eq!(v, json!({ "streams": ["Science"] }));
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let output = "Sure! Here you go:\n```json\n{\"careers\": [\"Doctor\"]}\n```\nGood luck.";
        let v: Value = extract_object(output).unwrap();
        assert_eq!(v, json!({ "careers": ["Doctor"] }));
    }

    #[test]
    fn test_object_missing_or_broken() {
        assert!(extract_object::<Value>("").is_none());
        assert!(extract_object::<Value>("no json here").is_none());
        assert!(extract_object::<Value>("} backwards {").is_none());
        assert!(extract_object::<Value>("{ \"streams\": [ }").is_none());
    }

    #[test]
    fn test_array_wrapped_in_prose() {
        let output = r#"My picks: [{"college": "IISc", "location": "Bengaluru", "reason": "Research"}] done"#;
        let v: Value = extract_array(output).unwrap();
        assert_eq!(v[0]["college"], "IISc");
    }

    #[test]
    fn test_array_absent_is_error() {
        assert!(extract_array::<Value>("I cannot help with that.").is_err());
    }
}
