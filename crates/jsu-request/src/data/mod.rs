//! Data layer: request and response descriptions.

mod options;
mod request;
mod response;

pub use options::ClientOptions;
pub use request::{Body, FormData, FormValue, Method, Request, UploadProgress};
pub use response::{JsonReply, Response};
