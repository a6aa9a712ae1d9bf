use serde::Serialize;
use serde_json::json;

use crate::error::Result;

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    ok: bool,
    result: &'a T,
}

/// `{ "ok": true, "result": ... }`
pub fn render_success<T: Serialize>(result: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Success { ok: true, result })?)
}

/// `{ "ok": false, "error": "..." }`
pub fn render_failure(message: &str) -> String {
    format!("{:#}", json!({ "ok": false, "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_success_envelope() {
        let rendered = render_success(&vec![1, 2]).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["result"], json!([1, 2]));
    }

    #[test]
    fn test_failure_envelope() {
        let value: Value = serde_json::from_str(&render_failure("Unknown migration profile")).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"], "Unknown migration profile");
        assert!(value.get("result").is_none());
    }
}
