mod cancel;
mod uploader;

pub use cancel::CancelHandle;
pub use uploader::ChunkedUpload;
