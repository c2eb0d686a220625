use std::path::Path;

use bytes::Bytes;

/// Named byte source to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSource {
    name: String,
    data: Bytes,
}

impl UploadSource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a whole file into memory, named after its last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, data))
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn len(&self) -> u64 { self.data.len() as u64 }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Bytes `[start, end)`, clipped to the source.
    pub fn slice(&self, start: u64, end: u64) -> Bytes {
        let len = self.data.len();
        let end = (end.min(len as u64)) as usize;
        let start = (start as usize).min(end);
        self.data.slice(start..end)
    }
}
