use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

/// Bytes left unescaped in query keys and values, as `encodeURIComponent` does.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Options,
    Trace,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Methods that never carry a CSRF token.
    pub fn is_safe(&self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Options | Method::Trace)
    }

    /// Parse a method name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "OPTIONS" => Some(Method::Options),
            "TRACE" => Some(Method::Trace),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One value of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        content_type: Option<String>,
        data: Bytes,
    },
}

/// Ordered multipart form fields. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.append_text(name, value);
        self
    }

    #[must_use]
    pub fn file(mut self, name: impl Into<String>, filename: impl Into<String>, data: Bytes) -> Self {
        self.fields.push((
            name.into(),
            FormValue::File {
                filename: filename.into(),
                content_type: None,
                data,
            },
        ));
        self
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl ToString) {
        self.fields.push((name.into(), FormValue::Text(value.to_string())));
    }

    pub fn fields(&self) -> &[(String, FormValue)] { &self.fields }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// Last text value stored under `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().rev().find_map(|(n, v)| match v {
            FormValue::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }

    /// Total size of all file parts in bytes.
    pub fn file_bytes(&self) -> u64 {
        self.fields
            .iter()
            .map(|(_, v)| match v {
                FormValue::File { data, .. } => data.len() as u64,
                FormValue::Text(_) => 0,
            })
            .sum()
    }
}

/// Request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Form(FormData),
    Json(Value),
    Bytes(Bytes),
    Text(String),
}

impl Body {
    pub fn is_empty(&self) -> bool { matches!(self, Body::Empty) }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self { Body::Form(form) }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self { Body::Json(value) }
}

impl From<Bytes> for Body {
    fn from(data: Bytes) -> Self { Body::Bytes(data) }
}

/// Callback receiving `(bytes_sent, bytes_total)` while a body is uploaded.
pub type UploadProgress = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Description of one outgoing HTTP call.
///
/// # Examples
///
/// ```
/// use jsu_request::{FormData, Method, Request};
///
/// let request = Request::new(Method::Post, "https://example.com/api")
///     .param("page", 2)
///     .header("X-Test", "yes")
///     .form(FormData::new().text("name", "value"));
/// assert_eq!(request.method, Method::Post);
/// ```
#[derive(Clone, Default)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Query parameters appended to `url` at dispatch. Names may repeat.
    pub params: Vec<(String, String)>,
    /// Request headers in insertion order. Names may repeat.
    pub headers: Vec<(String, String)>,
    pub body: Body,
    /// When `false` (the default) a cache-busting parameter is appended.
    pub cache: bool,
    pub on_upload_progress: Option<UploadProgress>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("cache", &self.cache)
            .field("on_upload_progress", &self.on_upload_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self { Self::new(Method::Get, url) }

    pub fn post(url: impl Into<String>) -> Self { Self::new(Method::Post, url) }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn form(mut self, form: FormData) -> Self {
        self.body = Body::Form(form);
        self
    }

    /// Send `value` as a JSON document.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    #[must_use]
    pub fn bytes(mut self, data: Bytes) -> Self {
        self.body = Body::Bytes(data);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Body::Text(text.into());
        self
    }

    #[must_use]
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn on_upload_progress(mut self, callback: UploadProgress) -> Self {
        self.on_upload_progress = Some(callback);
        self
    }

    /// URL with `params` percent-encoded into its query string.
    pub fn full_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| {
                let k = utf8_percent_encode(k, URI_COMPONENT);
                let v = utf8_percent_encode(v, URI_COMPONENT);
                format!("{k}={v}")
            })
            .collect::<Vec<_>>()
            .join("&");
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, sep, query)
    }

    /// All values of a header, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_and_safety() {
        assert_eq!(Method::parse("post"), Some(Method::Post));
        assert_eq!(Method::parse("BREW"), None);
        assert!(Method::Options.is_safe());
        assert!(!Method::Delete.is_safe());
    }

    #[test]
    fn test_full_url_appends_params() {
        let request = Request::get("http://localhost:9876").param("a b", "c&d");
        assert_eq!(request.full_url(), "http://localhost:9876?a%20b=c%26d");

        let request = Request::get("http://localhost/?x=1").param("y", 2);
        assert_eq!(request.full_url(), "http://localhost/?x=1&y=2");

        let request = Request::get("/search").param("q", "it's (a)*~!_.-").param("city", "Zürich/=");
        assert_eq!(request.full_url(), "/search?q=it's%20(a)*~!_.-&city=Z%C3%BCrich%2F%3D");
    }

    #[test]
    fn test_form_text_lookup_uses_last_value() {
        let form = FormData::new()
            .text("retries", 0)
            .file("file", "a.txt", Bytes::from_static(b"abc"))
            .text("retries", 1);
        assert_eq!(form.get_text("retries"), Some("1"));
        assert_eq!(form.file_bytes(), 3);
    }

    #[test]
    fn test_header_values_case_insensitive() {
        let request = Request::get("http://x")
            .header("Accept", "a")
            .header("accept", "b");
        let values: Vec<_> = request.header_values("ACCEPT").collect();
        assert_eq!(values, vec!["a", "b"]);
    }
}
