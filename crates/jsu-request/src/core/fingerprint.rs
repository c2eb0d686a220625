use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::{Body, FormValue, Method, Request};

/// Deterministic key identifying a logically unique request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a prepared request, ignoring the `cache_buster` query key.
    pub fn of(request: &Request, cache_buster: &str) -> Self {
        fingerprint(
            request.method,
            &request.full_url(),
            &request.body,
            &request.headers,
            cache_buster,
        )
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self { fp.0 }
}

/// Compute the fingerprint of a request.
///
/// The key is `method + url` with every `cache_buster=...` pair removed from the
/// query, followed by a stable rendering of the body and, when any are set, of
/// the headers. Rendering never fails; see [`stable_json`].
///
/// # Examples
///
/// ```
/// use jsu_request::{fingerprint, Body, Method};
///
/// let a = fingerprint(Method::Get, "http://h/?_=1&q=2", &Body::Empty, &[], "_");
/// let b = fingerprint(Method::Get, "http://h/?q=2&_=99", &Body::Empty, &[], "_");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "GEThttp://h/?q=2");
/// assert_eq!(b.as_str(), "GEThttp://h/?q=2");
/// ```
pub fn fingerprint(
    method: Method,
    url: &str,
    body: &Body,
    headers: &[(String, String)],
    cache_buster: &str,
) -> Fingerprint {
    let mut key = String::from(method.as_str());
    key.push_str(&strip_cache_buster(url, cache_buster));

    match body {
        Body::Empty => {}
        Body::Form(form) => {
            let mut fields = Map::new();
            for (name, value) in form.fields() {
                let rendered = match value {
                    FormValue::Text(text) => Value::String(text.clone()),
                    FormValue::File { data, .. } => Value::String(format!("blob-{}", data.len())),
                };
                fields.insert(name.clone(), rendered);
            }
            key.push_str(&stable_json(&fields));
        }
        Body::Bytes(data) => key.push_str(&format!("blob-{}", data.len())),
        Body::Json(value) => key.push_str(&stable_json(value)),
        Body::Text(text) => key.push_str(&stable_json(text)),
    }

    if !headers.is_empty() {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, value) in headers {
            grouped.entry(name.as_str()).or_default().push(value.as_str());
        }
        key.push_str(&stable_json(&grouped));
    }

    Fingerprint(key)
}

/// Remove every `key=value` pair named `key` from the query of `url`.
///
/// A `?` left with nothing after it is dropped as well.
pub fn strip_cache_buster<'a>(url: &'a str, key: &str) -> Cow<'a, str> {
    let (head, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let Some((base, query)) = head.split_once('?') else {
        return Cow::Borrowed(url);
    };

    let is_marker = |pair: &str| pair.split_once('=').is_some_and(|(k, _)| k == key);
    if !query.split('&').any(is_marker) {
        return Cow::Borrowed(url);
    }

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !is_marker(*pair))
        .collect();
    let kept = kept.join("&");
    let kept = kept.trim_end_matches('&');

    let mut out = String::from(base);
    if !kept.is_empty() {
        out.push('?');
        out.push_str(kept);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    Cow::Owned(out)
}

/// Compact JSON rendering that cannot fail.
///
/// When `value` refuses to serialize, the current timestamp is rendered
/// instead so fingerprinting stays side-effect free.
pub fn stable_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "body is not serializable, using timestamp fallback");
        format!("\"{}\"", chrono::Utc::now().to_rfc3339())
    })
}
