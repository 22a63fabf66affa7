//! Issue reports submitted for diagnosis.
//!
//! This module defines the user's problem description plus the optional
//! appliance photo, loaded from disk and encoded for inline upload.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::catalog::Appliance;
use crate::error::{Error, Result};

/// Maximum accepted photo size in bytes (10 MiB).
pub const MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// A photo of the appliance, ready for inline upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Base64-encoded image bytes.
    pub data: String,
    /// Image MIME type derived from the file extension.
    pub mime_type: String,
}

impl Photo {
    /// Load a photo from disk and encode it for upload.
    ///
    /// # Errors
    ///
    /// Returns an error if the file extension is not a supported image
    /// format, the file is larger than [`MAX_PHOTO_BYTES`], or the file
    /// cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mime_type = mime_type_for(path).ok_or_else(|| Error::PhotoFormat {
            path: path.to_path_buf(),
        })?;

        let metadata = fs::metadata(path).map_err(|source| Error::PhotoRead {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.len() > MAX_PHOTO_BYTES {
            return Err(Error::PhotoTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: MAX_PHOTO_BYTES,
            });
        }

        let bytes = fs::read(path).map_err(|source| Error::PhotoRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        })
    }
}

/// Map a file extension to its image MIME type.
fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A user's description of an appliance problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    /// The appliance being diagnosed.
    pub appliance: Appliance,
    /// Freeform description of the issue.
    pub description: String,
    /// Optional photo of the appliance or its error display.
    pub photo: Option<Photo>,
}

impl IssueReport {
    /// Create a new issue report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDescription`] if the description is empty or
    /// whitespace-only.
    pub fn new(
        appliance: Appliance,
        description: impl Into<String>,
        photo: Option<Photo>,
    ) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }
        Ok(Self {
            appliance,
            description,
            photo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::APPLIANCES;
    use std::path::PathBuf;

    fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("applaid-test-{}-{name}", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_photo_load_png() {
        let path = write_temp("photo.png", b"not really a png");
        let photo = Photo::load(&path).unwrap();

        assert_eq!(photo.mime_type, "image/png");
        assert_eq!(photo.data, STANDARD.encode(b"not really a png"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_photo_load_extension_case_insensitive() {
        let path = write_temp("photo-upper.JPG", &[0xFF, 0xD8, 0xFF]);
        let photo = Photo::load(&path).unwrap();

        assert_eq!(photo.mime_type, "image/jpeg");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_photo_load_unsupported_extension() {
        let path = write_temp("notes.txt", b"some text");
        let err = Photo::load(&path).unwrap_err();

        assert!(matches!(err, Error::PhotoFormat { .. }));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_photo_load_no_extension() {
        // Extension check happens before any file access
        let err = Photo::load("/nonexistent/photo").unwrap_err();
        assert!(matches!(err, Error::PhotoFormat { .. }));
    }

    #[test]
    fn test_photo_load_missing_file() {
        let err = Photo::load("/nonexistent/photo.png").unwrap_err();
        assert!(matches!(err, Error::PhotoRead { .. }));
    }

    #[test]
    fn test_photo_load_too_large() {
        let oversized = vec![0u8; (MAX_PHOTO_BYTES + 1) as usize];
        let path = write_temp("huge.gif", &oversized);
        let err = Photo::load(&path).unwrap_err();

        assert!(matches!(err, Error::PhotoTooLarge { .. }));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_photo_load_empty_file() {
        // Only an upper bound applies
        let path = write_temp("empty.webp", b"");
        let photo = Photo::load(&path).unwrap();

        assert_eq!(photo.mime_type, "image/webp");
        assert!(photo.data.is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_photo_data_roundtrip() {
        let bytes = [0x47, 0x49, 0x46, 0x38, 0x39, 0x61];
        let path = write_temp("anim.gif", &bytes);
        let photo = Photo::load(&path).unwrap();

        let decoded = STANDARD.decode(photo.data).unwrap();
        assert_eq!(decoded, bytes);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_mime_type_for_known_extensions() {
        assert_eq!(mime_type_for(Path::new("a.png")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a.gif")), Some("image/gif"));
        assert_eq!(mime_type_for(Path::new("a.webp")), Some("image/webp"));
        assert_eq!(mime_type_for(Path::new("a.bmp")), None);
        assert_eq!(mime_type_for(Path::new("a")), None);
    }

    #[test]
    fn test_issue_report_new() {
        let report = IssueReport::new(APPLIANCES[0], "It's making a loud noise", None).unwrap();

        assert_eq!(report.appliance.id, "refrigerator");
        assert_eq!(report.description, "It's making a loud noise");
        assert!(report.photo.is_none());
    }

    #[test]
    fn test_issue_report_empty_description() {
        let err = IssueReport::new(APPLIANCES[0], "", None).unwrap_err();
        assert!(matches!(err, Error::EmptyDescription));

        let err = IssueReport::new(APPLIANCES[0], "   \n  ", None).unwrap_err();
        assert!(matches!(err, Error::EmptyDescription));
    }

    #[test]
    fn test_issue_report_with_photo() {
        let photo = Photo {
            data: STANDARD.encode(b"fake image"),
            mime_type: "image/png".to_string(),
        };
        let report =
            IssueReport::new(APPLIANCES[1], "Leaking from the bottom", Some(photo)).unwrap();

        assert!(report.photo.is_some());
        assert_eq!(report.photo.unwrap().mime_type, "image/png");
    }
}
