//! Turning a picked image file into the inline payload Veo accepts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine;
use serde::Serialize;

use crate::error::EncodeError;

/// Image formats accepted as a starting frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Webp,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Png, MediaType::Jpeg, MediaType::Webp];

    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Webp => "image/webp",
        }
    }

    /// Detects the media type from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(MediaType::Png),
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "webp" => Some(MediaType::Webp),
            _ => None,
        }
    }
}

impl FromStr for MediaType {
    type Err = ();

    fn from_str(mime: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|media_type| media_type.mime().eq_ignore_ascii_case(mime.trim()))
            .ok_or(())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// An image file the user picked, with its declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub media_type: MediaType,
}

impl ImageFile {
    /// Returns `None` when the extension is not PNG, JPEG or WEBP.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let media_type = MediaType::from_path(&path)?;
        Some(Self { path, media_type })
    }
}

/// Base64 image payload, serialized as the `image` field of a Veo instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    #[serde(rename = "bytesBase64Encoded")]
    pub bytes: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], media_type: MediaType) -> Self {
        Self {
            bytes: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: media_type.mime().to_owned(),
        }
    }
}

/// Reads the whole file and encodes it.
///
/// An empty file is an error rather than an empty payload.
pub async fn encode_image(image: &ImageFile) -> Result<EncodedImage, EncodeError> {
    let bytes = tokio::fs::read(&image.path)
        .await
        .map_err(|source| EncodeError::Read {
            path: image.path.clone(),
            source,
        })?;

    if bytes.is_empty() {
        return Err(EncodeError::Empty {
            path: image.path.clone(),
        });
    }

    log::debug!(
        "Encoded {} ({} bytes, {})",
        image.path.display(),
        bytes.len(),
        image.media_type
    );
    Ok(EncodedImage::from_bytes(&bytes, image.media_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(MediaType::from_path(Path::new("a.PNG")), Some(MediaType::Png));
        assert_eq!(MediaType::from_path(Path::new("a.jpg")), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_path(Path::new("a.jpeg")), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_path(Path::new("dir/a.webp")), Some(MediaType::Webp));
        assert_eq!(MediaType::from_path(Path::new("a.gif")), None);
        assert_eq!(MediaType::from_path(Path::new("noext")), None);
        assert_eq!("IMAGE/WEBP".parse::<MediaType>(), Ok(MediaType::Webp));
        assert!("image/gif".parse::<MediaType>().is_err());
    }

    #[test]
    fn payload_serializes_with_wire_names() {
        let image = EncodedImage::from_bytes(b"hello", MediaType::Png);
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"bytesBase64Encoded": "aGVsbG8=", "mimeType": "image/png"})
        );
    }

    #[tokio::test]
    async fn encodes_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_file(&dir, "frame.jpg", &[0xff, 0xd8, 0xff]);
        let image = ImageFile::from_path(&path).unwrap();
        let encoded = encode_image(&image).await.unwrap();
        assert_eq!(encoded.bytes, "/9j/");
        assert_eq!(encoded.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_file(&dir, "empty.png", &[]);
        let image = ImageFile::from_path(&path).unwrap();
        let error = encode_image(&image).await.unwrap_err();
        assert!(matches!(error, EncodeError::Empty { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let image = ImageFile {
            path: PathBuf::from("/definitely/not/here.webp"),
            media_type: MediaType::Webp,
        };
        let error = encode_image(&image).await.unwrap_err();
        assert!(matches!(error, EncodeError::Read { .. }));
    }
}
