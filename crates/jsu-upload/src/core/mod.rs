//! Pure transformations: chunk ranges, progress arithmetic, naming and backoff.

mod chunk;
mod naming;
mod retry;

pub use chunk::{CHUNK_PROGRESS_SHARE, chunk_count, chunk_end, chunk_progress, content_range};
pub use naming::suffixed_file_name;
pub use retry::Backoff;
