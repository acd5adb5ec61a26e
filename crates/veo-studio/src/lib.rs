//! Prompt-to-video generation against the Veo model.
//!
//! A [`Session`] holds the form state and the generated video, a
//! [`Workflow`] runs one generation (submit, poll, download) against a
//! [`VideoBackend`], and [`VeoClient`] is the HTTP backend.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use veo_studio::{Config, Session, VeoClient, Workflow};
//!
//! let config = Config::from_env()?;
//! let workflow = Workflow::from_config(VeoClient::new(&config), &config);
//!
//! let mut session = Session::new();
//! session.set_prompt("a panda meditating")?;
//! session.run(&workflow, |s| {
//!     if let Some(status) = s.status() {
//!         eprintln!("{status}");
//!     }
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filename;
pub mod image;
pub mod request;
pub mod session;
pub mod video;
pub mod workflow;

pub use client::{VeoClient, VideoBackend};
pub use config::Config;
pub use error::{BackendError, ConfigError, EncodeError, GenerationError, SessionError};
pub use filename::download_file_name;
pub use image::{encode_image, EncodedImage, ImageFile, MediaType};
pub use request::{AspectRatio, GenerationRequest, Operation};
pub use session::{Phase, Session, Submission};
pub use video::VideoResource;
pub use workflow::{progress_channel, Progress, ProgressReceiver, ProgressSender, Workflow};
