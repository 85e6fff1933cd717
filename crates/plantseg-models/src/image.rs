//! Source images selected for a batch.

/// File extensions accepted for analysis (lower-case, without the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns true if the file name has one of the supported image extensions.
pub fn is_supported_image(file_name: &str) -> bool {
    extension(file_name)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Raw image bytes plus the original file name.
///
/// Held only for the duration of one batch submission.
#[derive(Clone)]
pub struct SourceImage {
    /// Original file name, used as the report row key
    pub file_name: String,
    /// Encoded image payload
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type derived from the file extension.
    pub fn mime_type(&self) -> &'static str {
        match extension(&self.file_name).as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
