//! `Cookie` header lookup and `Set-Cookie` rendering.

use chrono::{DateTime, Days, Utc};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Days a cookie lives when no expiry is given.
pub const DEFAULT_EXPIRE_DAYS: u64 = 360;

/// Bytes escaped in cookie values.
const COOKIE_VALUE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b',').add(b';').add(b'\\').add(b'%');

/// Look `name` up in a `Cookie` header, percent-decoding its value.
///
/// # Examples
///
/// ```
/// use jsu_util::cookie::cookie_value;
///
/// let header = "csrftoken=abc%20def; theme=dark";
/// assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("abc def"));
/// assert_eq!(cookie_value(header, "missing"), None);
/// ```
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim_start().split_once('=')?;
        (key == name).then(|| percent_decode_str(value).decode_utf8_lossy().into_owned())
    })
}

/// [`cookie_value`] with a fallback.
pub fn get_cookie(header: &str, name: &str, default: &str) -> String {
    cookie_value(header, name).unwrap_or_else(|| default.to_string())
}

/// Render a `Set-Cookie` value valid for `expire_days` days from `now`.
///
/// Cookies set from an `https://` origin are marked `secure; samesite=none`.
pub fn set_cookie(name: &str, value: &str, expire_days: Option<u64>, origin: &str, now: DateTime<Utc>) -> String {
    let days = expire_days.unwrap_or(DEFAULT_EXPIRE_DAYS);
    let expires = now.checked_add_days(Days::new(days)).unwrap_or(DateTime::<Utc>::MAX_UTC);
    let secure = if origin.starts_with("https://") {
        "; secure; samesite=none"
    } else {
        ""
    };
    format!(
        "{}={}; expires={}; path=/{}",
        name,
        utf8_percent_encode(value, COOKIE_VALUE),
        expires.format("%a, %d %b %Y %H:%M:%S GMT"),
        secure
    )
}
