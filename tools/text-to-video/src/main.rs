//! To run the program, please execute the following commands in your terminal:
//!
//! 1.  **Set the environment variable for your API key:**
//!     ```bash
//!     export GEMINI_API_KEY="YOUR_GEMINI_API_KEY"
//!     ```
//!     (Replace `"YOUR_GEMINI_API_KEY"` with your actual key.)
//! 2.  **Run the tool using cargo:**
//!     ```bash
//!     cargo r -p text-to-video -- "a panda meditating" --aspect-ratio 9:16
//!     ```
//!     Add `--image start.png` to animate a starting frame and `--play` to
//!     watch the result. Leave out the prompt to start an interactive session.

mod indicator;
mod player;
mod repl;

use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use veo_studio::{AspectRatio, Config, Session, VeoClient, VideoBackend, Workflow};

use crate::indicator::{Indicator, ROTATE_EVERY};

#[derive(Parser, Debug)]
#[command(name = "text-to-video", version, about = "Generate a video from a prompt with Veo")]
struct Cli {
    /// Prompt describing the video. Omit to start an interactive session.
    prompt: Vec<String>,

    /// Starting frame (PNG, JPEG or WEBP)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// One of 16:9, 1:1 or 9:16
    #[arg(short, long, default_value = "16:9")]
    aspect_ratio: AspectRatio,

    /// Directory the finished video is saved into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seconds between status checks
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many status checks
    #[arg(long)]
    max_polls: Option<u32>,

    /// Veo model identifier
    #[arg(long)]
    model: Option<String>,

    /// Open each finished video in the system player
    #[arg(long)]
    play: bool,
}

/// Runs one generation, printing status changes and reassuring messages.
pub async fn generate<B: VideoBackend>(session: &mut Session, workflow: &Workflow<B>) -> Result<()> {
    let indicator = RefCell::new(Indicator::new());
    eprintln!("{}", indicator.borrow().message());

    {
        let run = session.run(workflow, |s| {
            if let Some(status) = indicator.borrow_mut().update(s) {
                eprintln!("{}", status);
            }
        });
        tokio::pin!(run);

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + ROTATE_EVERY, ROTATE_EVERY);
        loop {
            tokio::select! {
                result = &mut run => break result?,
                _ = ticker.tick() => eprintln!("  {}", indicator.borrow_mut().rotate()),
            }
        }
    }

    match player::result_view(session) {
        Some(view) => {
            eprintln!("{}", view);
            Ok(())
        }
        None => Err(eyre!(session
            .error()
            .unwrap_or("An unexpected error occurred.")
            .to_owned())),
    }
}

/// Main entry point for the application.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    // --- 1. Setup ---
    let cli = Cli::parse();
    let mut config = Config::from_env().wrap_err("Refusing to start without an API key")?;
    if let Some(seconds) = cli.poll_interval {
        config.poll_interval = Duration::from_secs(seconds);
    }
    if cli.max_polls.is_some() {
        config.max_polls = cli.max_polls;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    log::debug!("Using model {} at {}", config.model, config.base_url);

    let workflow = Workflow::from_config(VeoClient::new(&config), &config);

    let mut session = Session::new();
    session.select_aspect_ratio(cli.aspect_ratio)?;
    if let Some(image) = cli.image {
        session.attach_image(image)?;
    }

    if cli.prompt.is_empty() {
        return repl::run(&mut session, &workflow, &cli.output_dir, cli.play).await;
    }

    // --- 2. Generate Video ---
    session.set_prompt(cli.prompt.join(" "))?;
    tokio::select! {
        outcome = generate(&mut session, &workflow) => outcome?,
        _ = tokio::signal::ctrl_c() => return Err(eyre!("Interrupted before the video was ready")),
    }

    // --- 3. Save Video ---
    let saved = session
        .download(&cli.output_dir)
        .await
        .wrap_err("Failed to save the generated video")?;
    eprintln!("Saved video to {}", saved.display());
    if cli.play {
        player::open_video(&saved)?;
    }

    Ok(())
}
