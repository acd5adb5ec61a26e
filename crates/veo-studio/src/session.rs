//! State of the prompt form and its one in-flight generation.

use std::path::{Path, PathBuf};

use crate::client::VideoBackend;
use crate::error::{GenerationError, SessionError};
use crate::filename::download_file_name;
use crate::image::ImageFile;
use crate::request::AspectRatio;
use crate::video::VideoResource;
use crate::workflow::{progress_channel, Progress, Workflow};

/// Where the session is in its Idle → Loading → Ready cycle.
#[derive(Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        status: Option<String>,
    },
    Ready(VideoResource),
}

/// Inputs captured when a generation starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub prompt: String,
    pub image: Option<ImageFile>,
    pub aspect_ratio: AspectRatio,
}

/// Everything the front end shows, plus the video it currently holds.
///
/// At most one generation runs at a time; form edits are refused while one
/// is loading. A held video is released when it is replaced, when the user
/// asks for another one, or when the session is dropped.
#[derive(Debug, Default)]
pub struct Session {
    prompt: String,
    image: Option<ImageFile>,
    aspect_ratio: AspectRatio,
    phase: Phase,
    error: Option<String>,
    last_prompt: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Prompt of the most recent submission, kept after the form is cleared.
    pub fn last_prompt(&self) -> &str {
        &self.last_prompt
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Latest progress text while loading.
    pub fn status(&self) -> Option<&str> {
        match &self.phase {
            Phase::Loading { status } => status.as_deref(),
            _ => None,
        }
    }

    pub fn video(&self) -> Option<&VideoResource> {
        match &self.phase {
            Phase::Ready(video) => Some(video),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.prompt.trim().is_empty()
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_loading() {
            Err(SessionError::Busy)
        } else {
            Ok(())
        }
    }

    // --- Form ---

    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.prompt = prompt.into();
        Ok(())
    }

    /// Attaches an image, replacing any previous one.
    pub fn attach_image(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let path = path.into();
        let image = ImageFile::from_path(&path).ok_or(SessionError::UnsupportedImage { path })?;
        self.image = Some(image);
        Ok(())
    }

    pub fn remove_image(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.image = None;
        Ok(())
    }

    pub fn select_aspect_ratio(&mut self, aspect_ratio: AspectRatio) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    pub fn cycle_aspect_ratio(&mut self) -> Result<AspectRatio, SessionError> {
        self.select_aspect_ratio(self.aspect_ratio.next())?;
        Ok(self.aspect_ratio)
    }

    // --- Generation lifecycle ---

    /// Starts a generation from the current form.
    ///
    /// A blank prompt records the input error and leaves the session idle.
    pub fn begin(&mut self) -> Result<Submission, SessionError> {
        self.ensure_idle()?;
        if self.prompt.trim().is_empty() {
            self.error = Some(SessionError::EmptyPrompt.to_string());
            return Err(SessionError::EmptyPrompt);
        }

        self.release_video();
        self.error = None;
        self.last_prompt = self.prompt.clone();
        self.phase = Phase::Loading { status: None };

        Ok(Submission {
            prompt: self.prompt.clone(),
            image: self.image.clone(),
            aspect_ratio: self.aspect_ratio,
        })
    }

    pub fn record_progress(&mut self, progress: &Progress) {
        if let Phase::Loading { status } = &mut self.phase {
            *status = Some(progress.to_string());
        }
    }

    /// Ends the running generation with its outcome.
    pub fn finish(&mut self, outcome: Result<VideoResource, GenerationError>) -> Result<(), SessionError> {
        if !self.is_loading() {
            return Err(SessionError::NotLoading);
        }
        match outcome {
            Ok(video) => self.phase = Phase::Ready(video),
            Err(error) => {
                self.error = Some(error.to_string());
                self.phase = Phase::Idle;
            }
        }
        Ok(())
    }

    /// Runs one generation end to end, calling `on_change` after every
    /// state change so a front end can redraw.
    pub async fn run<B: VideoBackend>(
        &mut self,
        workflow: &Workflow<B>,
        mut on_change: impl FnMut(&Session),
    ) -> Result<(), SessionError> {
        let submission = self.begin()?;
        on_change(self);

        let (sender, mut receiver) = progress_channel();
        let generation = workflow.generate(
            &submission.prompt,
            submission.image.as_ref(),
            submission.aspect_ratio,
            &sender,
        );
        tokio::pin!(generation);

        let outcome = loop {
            tokio::select! {
                outcome = &mut generation => break outcome,
                Some(progress) = receiver.recv() => {
                    self.record_progress(&progress);
                    on_change(self);
                }
            }
        };
        while let Ok(progress) = receiver.try_recv() {
            self.record_progress(&progress);
            on_change(self);
        }

        self.finish(outcome)?;
        on_change(self);
        Ok(())
    }

    /// Drops the held video and returns to the empty form.
    pub fn generate_another(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.release_video();
        self.error = None;
        Ok(())
    }

    /// Saves the held video into `dir` under a name derived from the last prompt.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let video = self.video().ok_or(SessionError::NoVideo)?;
        let path = dir.join(download_file_name(&self.last_prompt));
        video
            .persist_to(&path)
            .await
            .map_err(|source| SessionError::Download {
                path: path.clone(),
                source,
            })?;
        log::info!("Saved video to {}", path.display());
        Ok(path)
    }

    fn release_video(&mut self) {
        if let Phase::Ready(video) = std::mem::take(&mut self.phase) {
            if let Err(e) = video.release() {
                log::warn!("Failed to release previous video: {}", e);
            }
        }
    }
}
