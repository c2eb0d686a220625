use bytes::Bytes;
use serde_json::{Map, Value, json};

/// A completed HTTP exchange as seen by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String { String::from_utf8_lossy(&self.body).into_owned() }

    /// Decode the body as JSON, never failing.
    ///
    /// An empty body yields `{"error": "No response.", "empty": true, "raw": ""}`;
    /// an unparsable one yields `{"error": "Failed to parse json response: ...", "raw": ...}`.
    pub fn json_lenient(&self) -> Value {
        let raw = self.text();
        if raw.is_empty() {
            return json!({ "error": "No response.", "empty": true, "raw": raw });
        }
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => json!({
                "error": format!("Failed to parse json response: {e}"),
                "raw": raw,
            }),
        }
    }
}

/// Status plus decoded JSON body, the shape reply-driven callers work with.
///
/// Transport failures and suppressed duplicates are folded into status `0`
/// with an `error` member so one code path handles every outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub status: u16,
    pub body: Value,
}

impl JsonReply {
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status,
            body: response.json_lenient(),
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(message.into()));
        Self {
            status: 0,
            body: Value::Object(body),
        }
    }

    /// String member of the body, if present.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Non-negative integer member of the body, if present.
    pub fn u64_field(&self, name: &str) -> Option<u64> {
        let value = self.body.get(name)?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
    }

    pub fn error(&self) -> Option<&str> { self.str_field("error") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lenient_empty_body() {
        let reply = Response::new(200, "").json_lenient();
        assert_eq!(reply["error"], "No response.");
        assert_eq!(reply["empty"], true);
    }

    #[test]
    fn test_json_lenient_invalid_body() {
        let reply = Response::new(200, "<html>").json_lenient();
        let error = reply["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to parse json response:"));
        assert_eq!(reply["raw"], "<html>");
    }

    #[test]
    fn test_reply_fields() {
        let reply = JsonReply::from_response(&Response::new(
            400,
            r#"{"upload_id": "abc", "offset": 10, "error": "bad"}"#,
        ));
        assert_eq!(reply.str_field("upload_id"), Some("abc"));
        assert_eq!(reply.u64_field("offset"), Some(10));
        assert_eq!(reply.error(), Some("bad"));
        assert_eq!(reply.u64_field("missing"), None);
    }

    #[test]
    fn test_reply_from_error() {
        let reply = JsonReply::from_error("boom");
        assert_eq!(reply.status, 0);
        assert_eq!(reply.error(), Some("boom"));
    }
}
