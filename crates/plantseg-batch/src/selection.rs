//! Image selection for a batch.

use std::path::{Path, PathBuf};

use plantseg_models::{is_supported_image, SourceImage};
use tracing::warn;

use crate::error::{BatchError, BatchResult};

/// Maximum number of images submitted in one batch.
pub const MAX_BATCH_SIZE: usize = 10;

/// Outcome of filtering user-supplied paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Paths that will be submitted, in the order given
    pub accepted: Vec<PathBuf>,
    /// Paths rejected for an unsupported extension
    pub skipped: Vec<PathBuf>,
    /// Supported paths dropped because the batch was full
    pub truncated: Vec<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Keep jpg/jpeg/png paths and cap the batch at [`MAX_BATCH_SIZE`].
pub fn select_images<P: AsRef<Path>>(paths: &[P]) -> Selection {
    let mut selection = Selection::default();

    for path in paths {
        let path = path.as_ref();
        if !is_supported_image(&file_name(path)) {
            warn!(path = %path.display(), "Skipping unsupported file");
            selection.skipped.push(path.to_path_buf());
        } else if selection.accepted.len() < MAX_BATCH_SIZE {
            selection.accepted.push(path.to_path_buf());
        } else {
            selection.truncated.push(path.to_path_buf());
        }
    }

    if !selection.truncated.is_empty() {
        warn!(
            dropped = selection.truncated.len(),
            "Batch limited to {} images", MAX_BATCH_SIZE
        );
    }

    selection
}

/// Read the selected files into memory, keeping their order.
pub async fn load_images(paths: &[PathBuf]) -> BatchResult<Vec<SourceImage>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| BatchError::read_image(path.display().to_string(), e))?;
        images.push(SourceImage::new(file_name(path), bytes));
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_unsupported_files() {
        let selection = select_images(&["a.png", "notes.txt", "dir/b.JPG", "c.gif"]);
        assert_eq!(
            selection.accepted,
            vec![PathBuf::from("a.png"), PathBuf::from("dir/b.JPG")]
        );
        assert_eq!(selection.skipped.len(), 2);
        assert!(selection.truncated.is_empty());
    }

    #[test]
    fn test_caps_batch_size() {
        let paths: Vec<String> = (0..13).map(|i| format!("img_{i}.jpeg")).collect();
        let selection = select_images(&paths);
        assert_eq!(selection.accepted.len(), MAX_BATCH_SIZE);
        assert_eq!(selection.accepted[0], PathBuf::from("img_0.jpeg"));
        assert_eq!(selection.truncated.len(), 3);
    }

    #[tokio::test]
    async fn test_load_images_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wheat_1.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let images = load_images(&[path]).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_name, "wheat_1.png");
        assert_eq!(images[0].bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let err = load_images(&[PathBuf::from("/nonexistent/x.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::ReadImage { .. }));
    }
}
