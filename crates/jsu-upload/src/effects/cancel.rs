use std::sync::Arc;

use tokio::sync::watch;

/// Stops a running upload.
///
/// Cancelling aborts the call in flight (its fingerprint is released), skips
/// any pending retry wait and ends the upload with
/// [`UploadError::Cancelled`](crate::UploadError::Cancelled).
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) { self.sender.send_replace(true); }

    pub fn is_cancelled(&self) -> bool { *self.sender.borrow() }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> { self.sender.subscribe() }
}
