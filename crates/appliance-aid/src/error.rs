//! Error types for appliance-aid.
//!
//! This module defines all error types used throughout the appliance-aid crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for appliance-aid operations.
#[derive(Error, Debug)]
pub enum Error {
    // === API Errors ===
    /// No Gemini API key was configured.
    #[error(
        "Gemini API key is not set: add api.key to the config file or set \
         the GEMINI_API_KEY environment variable"
    )]
    ApiKeyMissing,

    /// The HTTP request to the Gemini API failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Gemini API returned an error response.
    #[error("Gemini API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message from the API error envelope.
        message: String,
    },

    /// The model reply contained no usable text.
    #[error("model returned an empty response")]
    EmptyResponse,

    // === Listing Errors ===
    /// The technician listing reply could not be parsed.
    #[error("failed to parse technician listings: {message}")]
    ListingParse {
        /// Description of what went wrong.
        message: String,
    },

    // === Report Errors ===
    /// The issue description was empty.
    #[error("issue description must not be empty")]
    EmptyDescription,

    /// The requested appliance is not in the catalog.
    #[error("unknown appliance '{query}' (run 'applaid appliances' for the list)")]
    UnknownAppliance {
        /// The appliance the user asked for.
        query: String,
    },

    /// The photo file exceeds the upload size limit.
    #[error("photo {path} is {size} bytes, over the {limit} byte limit")]
    PhotoTooLarge {
        /// Path to the photo file.
        path: PathBuf,
        /// Actual file size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: u64,
    },

    /// The photo file extension is not a supported image format.
    #[error("unsupported photo format for {path}: use PNG, JPG, GIF, or WEBP")]
    PhotoFormat {
        /// Path to the photo file.
        path: PathBuf,
    },

    /// The photo file could not be read.
    #[error("failed to read photo {path}: {source}")]
    PhotoRead {
        /// Path to the photo file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Location Errors ===
    /// No coordinates were available for the technician search.
    #[error(
        "location is not set: pass --lat and --lng or add [location] to the \
         config file"
    )]
    LocationMissing,

    // === Storage Errors ===
    /// Failed to open or create the history database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for appliance-aid operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new API error from an error envelope.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new listing parse error.
    #[must_use]
    pub fn listing_parse(message: impl Into<String>) -> Self {
        Self::ListingParse {
            message: message.into(),
        }
    }

    /// Create a new unknown appliance error.
    #[must_use]
    pub fn unknown_appliance(query: impl Into<String>) -> Self {
        Self::UnknownAppliance {
            query: query.into(),
        }
    }

    /// Check if this error means no API key was configured.
    #[must_use]
    pub fn is_api_key_missing(&self) -> bool {
        matches!(self, Self::ApiKeyMissing)
    }

    /// Check if retrying the request could plausibly succeed.
    ///
    /// Transport failures and server-side (5xx) API errors are retryable;
    /// everything else indicates a problem on our end.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyResponse;
        assert_eq!(err.to_string(), "model returned an empty response");

        let err = Error::EmptyDescription;
        assert_eq!(err.to_string(), "issue description must not be empty");
    }

    #[test]
    fn test_api_key_missing_display_mentions_env_var() {
        let msg = Error::ApiKeyMissing.to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
        assert!(msg.contains("api.key"));
    }

    #[test]
    fn test_error_is_api_key_missing() {
        assert!(Error::ApiKeyMissing.is_api_key_missing());
        assert!(!Error::EmptyResponse.is_api_key_missing());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api(429, "quota exceeded");
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn test_is_retryable_for_server_errors() {
        assert!(Error::api(500, "internal").is_retryable());
        assert!(Error::api(503, "overloaded").is_retryable());
        assert!(!Error::api(400, "bad request").is_retryable());
        assert!(!Error::api(404, "no such model").is_retryable());
        assert!(!Error::ApiKeyMissing.is_retryable());
    }

    #[test]
    fn test_listing_parse_error_display() {
        let err = Error::listing_parse("no JSON array found");
        assert!(err.to_string().contains("no JSON array found"));
    }

    #[test]
    fn test_unknown_appliance_error_display() {
        let err = Error::unknown_appliance("toaster");
        let msg = err.to_string();
        assert!(msg.contains("toaster"));
        assert!(msg.contains("applaid appliances"));
    }

    #[test]
    fn test_photo_too_large_error_display() {
        let err = Error::PhotoTooLarge {
            path: PathBuf::from("/tmp/huge.png"),
            size: 20_000_000,
            limit: 10_485_760,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/huge.png"));
        assert!(msg.contains("20000000"));
    }

    #[test]
    fn test_photo_format_error_display() {
        let err = Error::PhotoFormat {
            path: PathBuf::from("notes.txt"),
        };
        let msg = err.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("PNG"));
    }

    #[test]
    fn test_photo_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::PhotoRead {
            path: PathBuf::from("/tmp/missing.jpg"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.jpg"));
    }

    #[test]
    fn test_location_missing_display_mentions_flags() {
        let msg = Error::LocationMissing.to_string();
        assert!(msg.contains("--lat"));
        assert!(msg.contains("--lng"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        // Create a rusqlite error by trying to open a non-existent DB in read-only mode
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "latitude out of range".to_string(),
        };
        assert!(err.to_string().contains("latitude out of range"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/root/forbidden"));
    }

    #[test]
    fn test_database_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::DatabaseOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            let msg = err.to_string();
            assert!(msg.contains("/nonexistent/path/db.sqlite"));
        }
    }
}
