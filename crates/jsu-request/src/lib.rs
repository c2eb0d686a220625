//! HTTP request wrapper with in-flight duplicate suppression.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Request, response and option types
//! - [`core`] - Pure fingerprinting
//! - [`effects`] - Transports and the deduplicating [`Client`]
//!
//! # Key Features
//!
//! - **Fingerprinting**: method, URL without cache-buster, body and headers form one stable key
//! - **Suppression**: an identical request in flight yields [`RequestError::Duplicated`], never a network call
//! - **Exactly-once release**: an RAII guard frees the fingerprint on response, error or abort

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{Fingerprint, fingerprint, stable_json, strip_cache_buster};
pub use data::{Body, ClientOptions, FormData, FormValue, JsonReply, Method, Request, Response, UploadProgress};
pub use effects::{Client, HttpTransport, InFlightGuard, InFlightRegistry};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestTransport;

pub use error::{DUPLICATED_MESSAGE, RequestError, Result};
