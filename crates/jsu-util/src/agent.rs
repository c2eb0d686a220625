//! User-agent sniffing.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Browser families told apart by [`UserAgent::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    Firefox,
    Edge,
    Chromium,
    Chrome,
    IeMobile,
    Ie,
    Opera,
    Konqueror,
    MobileSafari,
    Safari,
    Unknown,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
            Browser::Chromium => "chromium",
            Browser::Chrome => "chrome",
            Browser::IeMobile => "iemobile",
            Browser::Ie => "ie",
            Browser::Opera => "opera",
            Browser::Konqueror => "konqueror",
            Browser::MobileSafari => "mobile_safari",
            Browser::Safari => "safari",
            Browser::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Operating systems told apart by [`UserAgent::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Os {
    Ios,
    Windows,
    Macos,
    Linux,
    Unknown,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Ios => "ios",
            Os::Windows => "windows",
            Os::Macos => "macos",
            Os::Linux => "linux",
            Os::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// `(needle, browser, version pattern)`; the first needle found decides.
static BROWSER_RULES: Lazy<Vec<(&'static str, Browser, Regex)>> = Lazy::new(|| {
    [
        ("firefox", Browser::Firefox, r"firefox/(\d+)\.(\d+)"),
        ("edge", Browser::Edge, r"edge/(\d+)\.(\d+)"),
        ("chromium", Browser::Chromium, r"chromium/(\d+)\.(\d+)"),
        ("chrome", Browser::Chrome, r"chrome/(\d+)\.(\d+)"),
        ("iemobile", Browser::IeMobile, r"iemobile/(\d+)\.(\d+)"),
        ("msie", Browser::Ie, r"msie (\d+)\.(\d+)"),
        ("trident", Browser::Ie, r"rv.(\d+)\.(\d+)"),
        ("opera", Browser::Opera, r"opera/(\d+)\.(\d+)"),
        ("konqueror", Browser::Konqueror, r"konqueror/(\d+)\.(\d+)"),
        ("mobile safari", Browser::MobileSafari, r"mobile safari/(\d+)\.(\d+)"),
        ("safari", Browser::Safari, r"version/(\d+)\.(\d+)"),
    ]
    .into_iter()
    .map(|(needle, browser, pattern)| (needle, browser, Regex::new(pattern).unwrap()))
    .collect()
});

static FIREFOX_RV: Lazy<Regex> = Lazy::new(|| Regex::new(r"rv:(\d+)\.(\d+)").unwrap());

static IOS_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CPU.*OS ([0-9_]{1,5})|(CPU like).*AppleWebKit.*Mobile").unwrap());

const MOBILE_MARKERS: &[&str] = &[
    "iphone",
    "ipod",
    "ipad",
    "android",
    "iemobile",
    "opera mobi",
    "opera mini",
    "windows ce",
    "fennec",
    "series60",
    "symbian",
    "blackberry",
];

/// What a user-agent string reveals about its client.
///
/// Versions are `major.minor` floats with the minor part zero-padded to ten
/// digits, so `57.2` and `57.10` compare in release order.
///
/// # Examples
///
/// ```
/// use jsu_util::agent::{Browser, Os, UserAgent};
///
/// let ua = UserAgent::parse("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0");
/// assert_eq!(ua.browser_name, Browser::Firefox);
/// assert_eq!(ua.os_name, Os::Linux);
/// assert!(ua.is_recording_available());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAgent {
    /// Lowercased source string.
    pub user_agent: String,
    pub browser_name: Browser,
    pub browser_version: f64,
    pub os_name: Os,
    /// Only known for iOS; `0.0` otherwise.
    pub os_version: f64,
    pub is_mobile: bool,
}

impl UserAgent {
    pub fn parse(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        let (browser_name, browser_version) = detect_browser(&ua);
        let (os_name, os_version) = detect_os(&ua);
        let is_mobile = MOBILE_MARKERS.iter().any(|marker| ua.contains(*marker));
        Self {
            user_agent: ua,
            browser_name,
            browser_version,
            os_name,
            os_version,
            is_mobile,
        }
    }

    /// Whether the browser can record media in the page.
    pub fn is_recording_available(&self) -> bool {
        let v = self.browser_version;
        match self.browser_name {
            Browser::Firefox => v >= 45.0,
            Browser::Chrome | Browser::Chromium => v >= 57.0,
            Browser::Safari => v >= 16.0,
            Browser::Edge => v >= 79.0,
            _ => false,
        }
    }

    /// Whether the browser can publish a live stream.
    pub fn is_livestreaming_available(&self) -> bool {
        let v = self.browser_version;
        match self.browser_name {
            Browser::Chrome | Browser::Chromium => v >= 57.0,
            Browser::Safari => v >= 16.0,
            Browser::Edge => v >= 79.0,
            _ => false,
        }
    }
}

fn detect_browser(ua: &str) -> (Browser, f64) {
    let Some((_, browser, pattern)) = BROWSER_RULES.iter().find(|(needle, _, _)| ua.contains(*needle)) else {
        return (Browser::Unknown, 0.0);
    };
    let mut version = extract_version(ua, pattern);
    if *browser == Browser::Firefox && version == 0.0 {
        version = extract_version(ua, &FIREFOX_RV);
    }
    (*browser, version)
}

/// `major.minor` from the first two groups of `pattern`.
fn extract_version(ua: &str, pattern: &Regex) -> f64 {
    let Some(caps) = pattern.captures(ua) else {
        return 0.0;
    };
    let Some(major) = caps.get(1).map(|m| m.as_str()) else {
        return 0.0;
    };
    let minor = caps.get(2).map(|m| format!("{:0>10}", m.as_str())).unwrap_or_default();
    format!("{major}.{minor}").parse().unwrap_or(0.0)
}

fn detect_os(ua: &str) -> (Os, f64) {
    if ["ipad", "iphone", "ipod"].iter().any(|d| ua.contains(*d)) {
        return (Os::Ios, ios_version(ua));
    }
    if ua.contains("win") {
        (Os::Windows, 0.0)
    } else if ua.contains("mac") {
        (Os::Macos, 0.0)
    } else if ua.contains("x11") || ua.contains("linux") {
        (Os::Linux, 0.0)
    } else {
        (Os::Unknown, 0.0)
    }
}

/// At most five characters are read, so `9_3_5` is `9.35` and `17_1_2` is
/// `17.1`. `CPU like` devices predate the version marker and report `3.2`.
fn ios_version(ua: &str) -> f64 {
    let Some(caps) = IOS_VERSION.captures(ua) else {
        return 0.0;
    };
    let raw = caps.get(1).map_or("3_2", |m| m.as_str());
    let dotted = raw.replacen('_', ".", 1).replacen('_', "", 1);
    dotted.trim_end_matches('.').parse().unwrap_or(0.0)
}
