//! Picking local image files for upload.

use std::path::Path;

use bytes::Bytes;
use meetspace_core::{AppError, AppResult, SelectedFile};

/// Content type of an image file, from its extension.
pub fn image_content_type(path: &Path) -> Option<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "heic" => Some("image/heic"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Read a picked image file. Files without an image extension are rejected.
pub async fn read_image_file(path: &Path) -> AppResult<(SelectedFile, Bytes)> {
    let content_type = image_content_type(path)
        .ok_or_else(|| AppError::NotAnImage(path.display().to_string()))?;

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::InvalidInput(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    tracing::debug!(file_name = %file_name, content_type, size = bytes.len(), "Selected image");
    Ok((
        SelectedFile {
            path: path.to_path_buf(),
            file_name,
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
        },
        Bytes::from(bytes),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(image_content_type(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(image_content_type(Path::new("dir/a.jpeg")), Some("image/jpeg"));
        assert_eq!(image_content_type(Path::new("notes.txt")), None);
        assert_eq!(image_content_type(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn read_image_file_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hi").unwrap();
        assert!(matches!(
            read_image_file(&path).await,
            Err(AppError::NotAnImage(_))
        ));

        let image = dir.path().join("logo.png");
        std::fs::write(&image, b"png").unwrap();
        let (file, bytes) = read_image_file(&image).await.unwrap();
        assert_eq!(file.file_name, "logo.png");
        assert_eq!(file.size, 3);
        assert_eq!(bytes.as_ref(), b"png");
    }
}
