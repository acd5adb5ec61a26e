//! Submit → poll → download pipeline for one generation.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::client::VideoBackend;
use crate::config::{Config, DEFAULT_POLL_INTERVAL};
use crate::error::GenerationError;
use crate::image::{encode_image, ImageFile};
use crate::request::{AspectRatio, GenerationRequest, Operation};
use crate::video::VideoResource;

/// Phase reached by a running generation.
///
/// There is no fractional progress; only phase transitions are reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    Initializing,
    EncodingImage,
    Submitting,
    Submitted { operation: String },
    Polling { attempt: u32 },
    Finalizing,
    Downloading,
    Ready,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Progress::Initializing => "Initializing video generation...",
            Progress::EncodingImage => "Processing uploaded image...",
            Progress::Submitting => "Sending request to the model. This may take a moment...",
            Progress::Submitted { .. } => {
                "Video generation is in progress. This process can take several minutes. Please wait..."
            }
            Progress::Polling { .. } => "Checking generation status... still working on it.",
            Progress::Finalizing => "Finalizing video...",
            Progress::Downloading => "Downloading generated video...",
            Progress::Ready => "Video ready!",
        })
    }
}

pub type ProgressSender = mpsc::UnboundedSender<Progress>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<Progress>;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

fn emit(progress: &ProgressSender, event: Progress) {
    log::info!("{}", event);
    // Nobody listening is fine.
    let _ = progress.send(event);
}

/// Drives a [`VideoBackend`] through one generation at a time.
pub struct Workflow<B> {
    backend: B,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl<B: VideoBackend> Workflow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }

    pub fn from_config(backend: B, config: &Config) -> Self {
        Self::new(backend)
            .with_poll_interval(config.poll_interval)
            .with_max_polls(config.max_polls)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// `None` keeps polling until the remote operation finishes.
    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generates one video.
    ///
    /// Every failure is logged and returned as a single [`GenerationError`].
    pub async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageFile>,
        aspect_ratio: AspectRatio,
        progress: &ProgressSender,
    ) -> Result<VideoResource, GenerationError> {
        emit(progress, Progress::Initializing);

        let result = self.try_generate(prompt, image, aspect_ratio, progress).await;
        if let Err(error) = &result {
            log::error!("Error generating video: {}", error);
        }
        result
    }

    async fn try_generate(
        &self,
        prompt: &str,
        image: Option<&ImageFile>,
        aspect_ratio: AspectRatio,
        progress: &ProgressSender,
    ) -> Result<VideoResource, GenerationError> {
        let mut request = GenerationRequest::new(prompt, None, aspect_ratio)?;
        if let Some(image) = image {
            emit(progress, Progress::EncodingImage);
            request = request.with_image(encode_image(image).await?);
        }

        emit(progress, Progress::Submitting);
        let operation = self
            .backend
            .submit(&request)
            .await
            .map_err(GenerationError::request)?;
        emit(
            progress,
            Progress::Submitted {
                operation: operation.name.clone(),
            },
        );

        let operation = self.wait_until_done(operation, progress).await?;

        emit(progress, Progress::Finalizing);
        if let Some(error) = &operation.error {
            return Err(GenerationError::Operation {
                code: error.code,
                message: error.message.clone(),
            });
        }
        let uri = operation.video_uri().ok_or(GenerationError::NoOutput)?;

        emit(progress, Progress::Downloading);
        let bytes = self
            .backend
            .download(uri)
            .await
            .map_err(GenerationError::download)?;
        let video = VideoResource::store(&bytes)
            .await
            .map_err(GenerationError::Store)?;

        emit(progress, Progress::Ready);
        Ok(video)
    }

    async fn wait_until_done(
        &self,
        mut operation: Operation,
        progress: &ProgressSender,
    ) -> Result<Operation, GenerationError> {
        let mut attempts = 0;
        while !operation.is_done() {
            if self.max_polls.is_some_and(|max| attempts >= max) {
                return Err(GenerationError::PollLimit { attempts });
            }
            sleep(self.poll_interval).await;
            attempts += 1;
            log::debug!("Polling {} (attempt {})", operation.name, attempts);
            emit(progress, Progress::Polling { attempt: attempts });
            operation = self
                .backend
                .poll(&operation)
                .await
                .map_err(GenerationError::request)?;
        }
        Ok(operation)
    }
}
