//! Client-side helpers shared by the jsu crates.
//!
//! - [`cookie`] - `Cookie` lookup and `Set-Cookie` rendering
//! - [`text`] - trimming, slugs, HTML escaping and entity decoding
//! - [`agent`] - browser and OS detection from a user-agent string
//! - [`version`] - dotted version comparison
//! - [`i18n`] - translation catalogs with context keys and English fallback
//! - [`format`] - localized date and size display
//! - [`subtitle`] - WebVTT/SRT cue parsing
//! - [`focus`] - first/last focusable descendant walks

pub mod agent;
pub mod cookie;
pub mod focus;
pub mod format;
pub mod i18n;
pub mod subtitle;
pub mod text;
pub mod version;

pub use agent::{Browser, Os, UserAgent};
pub use i18n::Catalog;
