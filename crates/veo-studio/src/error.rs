use std::path::PathBuf;

/// Failures while loading [`crate::Config`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Failures while turning an image file into a request payload.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("failed to read image {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image {} is empty", .path.display())]
    Empty { path: PathBuf },
}

/// Failures reported by a [`crate::VideoBackend`].
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{reason}")]
    Status {
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Builds a [`BackendError::Status`] from a response status code.
    pub fn status(status: reqwest::StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_str().to_owned());
        Self::Status { status, reason }
    }
}

/// The one error a generation attempt surfaces to its caller.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("Please enter a prompt.")]
    EmptyPrompt,

    #[error("Video generation failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Video generation failed: {0}")]
    Request(String),

    #[error("Video generation failed: operation error (code {code}): {message}")]
    Operation { code: i32, message: String },

    #[error("Video generation failed: No download link found.")]
    NoOutput,

    #[error("Video generation failed: Failed to download video: {status}")]
    Download { status: String },

    #[error("Video generation failed: operation still running after {attempts} status checks")]
    PollLimit { attempts: u32 },

    #[error("Video generation failed: could not store video: {0}")]
    Store(#[source] std::io::Error),

    #[error("An unknown error occurred during video generation.")]
    Unknown,
}

impl GenerationError {
    /// Translates a submit or poll failure.
    pub(crate) fn request(error: BackendError) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Request(message)
        }
    }

    /// Translates a download failure, keeping the transport status text.
    pub(crate) fn download(error: BackendError) -> Self {
        match error {
            BackendError::Status { reason, .. } => Self::Download { status: reason },
            BackendError::Http(error) => match error.status() {
                Some(status) => Self::download(BackendError::status(status)),
                None => Self::request(BackendError::Http(error)),
            },
            other => Self::request(other),
        }
    }
}

/// Failures of the presentation [`crate::Session`].
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("a video is already being generated")]
    Busy,

    #[error("Please enter a prompt.")]
    EmptyPrompt,

    #[error("unsupported image type: {} (expected PNG, JPEG or WEBP)", .path.display())]
    UnsupportedImage { path: PathBuf },

    #[error("no video generation in progress")]
    NotLoading,

    #[error("no generated video to download")]
    NoVideo,

    #[error("failed to save video to {}: {source}", .path.display())]
    Download {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_reason_text() {
        let error = BackendError::status(reqwest::StatusCode::FORBIDDEN);
        assert_eq!(error.to_string(), "Forbidden");

        let error = GenerationError::download(error);
        assert_eq!(
            error.to_string(),
            "Video generation failed: Failed to download video: Forbidden"
        );
    }

    #[test]
    fn blank_backend_message_is_unknown() {
        let error = GenerationError::request(BackendError::Other("  ".into()));
        assert!(matches!(error, GenerationError::Unknown));

        let error = GenerationError::request(BackendError::Other("quota exceeded".into()));
        assert_eq!(error.to_string(), "Video generation failed: quota exceeded");
    }
}
