//! Pure transformations: request fingerprinting.

mod fingerprint;

pub use fingerprint::{Fingerprint, fingerprint, stable_json, strip_cache_buster};
