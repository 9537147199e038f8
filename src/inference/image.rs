//! 解析対象画像の読み込み
//!
//! 形式やサイズの検証はしない。MIMEタイプは拡張子から推定し、
//! 不明ならJPEGとして送る。

use crate::error::{SentinelError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

const FALLBACK_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// ファイルから読み込み
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SentinelError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| SentinelError::ImageLoad(format!("{}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mime_type = path
            .extension()
            .map(|ext| mime_type_for_extension(&ext.to_string_lossy()))
            .unwrap_or(FALLBACK_MIME_TYPE);

        Ok(Self::new(file_name, mime_type, bytes))
    }

    /// Data URL（または生のBase64）から読み込み
    pub fn from_data_url(file_name: &str, data_url: &str) -> Result<Self> {
        let (mime_type, encoded) = if data_url.starts_with("data:") {
            let encoded = extract_base64_from_data_url(data_url)
                .ok_or_else(|| SentinelError::InvalidDataUrl(file_name.to_string()))?;
            (extract_mime_type_from_data_url(data_url), encoded)
        } else {
            (FALLBACK_MIME_TYPE, data_url)
        };

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| SentinelError::InvalidDataUrl(format!("{}: {}", file_name, e)))?;

        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// 拡張子からMIMEタイプを推定
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "gif" => "image/gif",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出（失敗時は "image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mime_type_for_extension() {
        assert_eq!(mime_type_for_extension("jpg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("JPEG"), "image/jpeg");
        assert_eq!(mime_type_for_extension("png"), "image/png");
        assert_eq!(mime_type_for_extension("WebP"), "image/webp");
        assert_eq!(mime_type_for_extension("bmp"), "image/jpeg");
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("beam.png");
        std::fs::write(&path, b"\x89PNG dummy").unwrap();

        let image = ImageInput::from_path(&path).unwrap();
        assert_eq!(image.file_name, "beam.png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, b"\x89PNG dummy");
    }

    #[test]
    fn test_from_path_not_validated() {
        // 中身が画像でなくてもそのまま送る
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image").unwrap();

        let image = ImageInput::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_from_path_missing() {
        let result = ImageInput::from_path(Path::new("/nonexistent/column.jpg"));
        assert!(matches!(result, Err(SentinelError::FileNotFound(_))));
    }

    #[test]
    fn test_from_data_url() {
        let image = ImageInput::from_data_url("wall.webp", "data:image/webp;base64,aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.bytes, b"hello");
    }

    #[test]
    fn test_from_raw_base64() {
        let image = ImageInput::from_data_url("wall", "aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, b"hello");
    }

    #[test]
    fn test_from_data_url_invalid() {
        assert!(matches!(
            ImageInput::from_data_url("x", "data:image/png;base64"),
            Err(SentinelError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            ImageInput::from_data_url("x", "data:image/png;base64,!!!"),
            Err(SentinelError::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn test_to_base64() {
        let image = ImageInput::new("a.jpg", "image/jpeg", b"hello".to_vec());
        assert_eq!(image.to_base64(), "aGVsbG8=");
        assert_eq!(image.len(), 5);
        assert!(!image.is_empty());
    }

    #[test]
    fn test_extract_base64_from_data_url() {
        assert_eq!(
            extract_base64_from_data_url("data:image/jpeg;base64,/9j/4AAQSkZJRg=="),
            Some("/9j/4AAQSkZJRg==")
        );
        assert_eq!(extract_base64_from_data_url("not a data url"), None);
    }

    #[test]
    fn test_extract_mime_type_default() {
        assert_eq!(extract_mime_type_from_data_url("invalid"), "image/jpeg");
        assert_eq!(extract_mime_type_from_data_url("data:;base64,abc"), "image/jpeg");
    }
}
