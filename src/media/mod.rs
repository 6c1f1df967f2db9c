//! Recorded media accepted for transcription.

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use std::fmt;
use std::path::Path;

use crate::error::ValidationError;

/// MIME types the transcription provider is asked to handle.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp4",
    "audio/wav",
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
];

/// 50 MiB.
pub const MAX_MEDIA_BYTES: usize = 50 * 1024 * 1024;

/// A recording plus its MIME type, consumed once by the workflow.
///
/// The payload is reference counted so view-model snapshots can hold the
/// asset without copying the recording.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaAsset {
    file_name: Option<String>,
    mime_type: String,
    data: Bytes,
}

impl MediaAsset {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Read a recording from disk, inferring the MIME type from its extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mime_type = mime_type_for_extension(&extension)
            .with_context(|| format!("Unsupported format: .{}", extension))?;

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut asset = Self::new(mime_type, data);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            asset = asset.with_file_name(name);
        }
        Ok(asset)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Display name used in logs and the file list.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("recording")
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check the MIME allow-list and size limit.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if !is_allowed_mime_type(&self.mime_type) {
            return Err(ValidationError::UnsupportedMimeType(self.mime_type.clone()));
        }
        if self.data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        if self.data.len() > MAX_MEDIA_BYTES {
            return Err(ValidationError::FileTooLarge {
                size: self.data.len(),
                limit: MAX_MEDIA_BYTES,
            });
        }
        Ok(())
    }
}

// Keeps multi-megabyte payloads out of debug logs.
impl fmt::Debug for MediaAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaAsset")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Map a lowercase file extension to one of the allowed MIME types.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "mp3" | "mpga" => Some("audio/mpeg"),
        "m4a" => Some("audio/mp4"),
        "wav" => Some("audio/wav"),
        "mp4" => Some("video/mp4"),
        "mpeg" | "mpg" => Some("video/mpeg"),
        "mov" | "qt" => Some("video/quicktime"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_allowed_types_pass_validation() {
        for mime in ALLOWED_MIME_TYPES {
            let asset = MediaAsset::new(*mime, vec![0u8; 16]);
            assert!(asset.validate().is_ok(), "{} should be accepted", mime);
        }
    }

    #[test]
    fn test_disallowed_type_is_rejected() {
        let asset = MediaAsset::new("image/png", vec![0u8; 16]);
        assert_eq!(
            asset.validate(),
            Err(ValidationError::UnsupportedMimeType("image/png".to_string()))
        );
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let at_limit = MediaAsset::new("audio/wav", vec![0u8; MAX_MEDIA_BYTES]);
        assert!(at_limit.validate().is_ok());

        let over = MediaAsset::new("audio/wav", vec![0u8; MAX_MEDIA_BYTES + 1]);
        assert_eq!(
            over.validate(),
            Err(ValidationError::FileTooLarge {
                size: MAX_MEDIA_BYTES + 1,
                limit: MAX_MEDIA_BYTES,
            })
        );
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let asset = MediaAsset::new("audio/mpeg", Vec::new());
        assert_eq!(asset.validate(), Err(ValidationError::EmptyFile));
    }

    #[test]
    fn test_mime_type_for_extension() {
        assert_eq!(mime_type_for_extension("mp3"), Some("audio/mpeg"));
        assert_eq!(mime_type_for_extension("mov"), Some("video/quicktime"));
        assert_eq!(mime_type_for_extension("m4a"), Some("audio/mp4"));
        assert_eq!(mime_type_for_extension("xyz"), None);
    }

    #[test]
    fn test_debug_omits_payload() {
        let asset = MediaAsset::new("audio/wav", vec![1u8, 2, 3]).with_file_name("a.wav");
        let debug = format!("{:?}", asset);
        assert!(debug.contains("len: 3"));
        assert!(!debug.contains("[1, 2, 3]"));
    }

    #[tokio::test]
    async fn test_from_path_infers_mime_type() {
        let mut file = tempfile::Builder::new().suffix(".WAV").tempfile().unwrap();
        file.write_all(b"RIFF....WAVE").unwrap();

        let asset = MediaAsset::from_path(file.path()).await.unwrap();
        assert_eq!(asset.mime_type(), "audio/wav");
        assert_eq!(asset.len(), 12);
        assert!(asset.file_name().unwrap().ends_with(".WAV"));
    }

    #[tokio::test]
    async fn test_from_path_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".xyz").tempfile().unwrap();
        let err = MediaAsset::from_path(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported format"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = MediaAsset::from_path(Path::new("/nonexistent/meeting.mp3"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
