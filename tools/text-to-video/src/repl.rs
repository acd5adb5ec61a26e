use std::future::Future;
use std::path::Path;

use color_eyre::eyre::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use veo_studio::{AspectRatio, Session, VideoBackend, Workflow};

use crate::{generate, player};

const HELP: &str = "\
Type a prompt and press enter to generate a video.
  :image <path>   attach a starting frame (PNG, JPEG or WEBP)
  :clear-image    remove the attached image
  :ratio [r]      pick 16:9, 1:1 or 9:16 (no argument cycles)
  :play           open the current video in the system player
  :download       save the current video
  :another        discard the current video
  :help           show this message
  :quit           exit (Ctrl-C works too)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    Image(String),
    ClearImage,
    Ratio(Option<AspectRatio>),
    Play,
    Download,
    Another,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return if line.is_empty() {
                Command::Empty
            } else {
                Command::Prompt(line.to_owned())
            };
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };
        match (name, argument) {
            ("image", path) if !path.is_empty() => Command::Image(path.to_owned()),
            ("clear-image", "") => Command::ClearImage,
            ("ratio", "") => Command::Ratio(None),
            ("ratio", ratio) => match ratio.parse() {
                Ok(ratio) => Command::Ratio(Some(ratio)),
                Err(_) => Command::Unknown(line.to_owned()),
            },
            ("play", "") => Command::Play,
            ("download", "") => Command::Download,
            ("another", "") => Command::Another,
            ("help", "") => Command::Help,
            ("quit" | "q" | "exit", "") => Command::Quit,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

fn describe(session: &Session) -> String {
    let image = session
        .image()
        .map(|image| image.path.display().to_string())
        .unwrap_or_else(|| "none".to_owned());
    match session.error() {
        Some(error) => format!("[{} | image: {} | error: {}]", session.aspect_ratio(), image, error),
        None => format!("[{} | image: {}]", session.aspect_ratio(), image),
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Interactive loop over stdin.
pub async fn run<B: VideoBackend>(
    session: &mut Session,
    workflow: &Workflow<B>,
    output_dir: &Path,
    autoplay: bool,
) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    run_with(session, workflow, output_dir, autoplay, input, ctrl_c()).await
}

/// Reads commands from `input` until it ends, `:quit` or `interrupt` fires.
///
/// An interrupt cancels any running generation and discards the held video
/// before returning.
pub async fn run_with<B: VideoBackend>(
    session: &mut Session,
    workflow: &Workflow<B>,
    output_dir: &Path,
    autoplay: bool,
    input: impl AsyncBufRead + Unpin,
    interrupt: impl Future<Output = ()>,
) -> Result<()> {
    eprintln!("{HELP}");
    eprintln!("{}", describe(session));

    tokio::pin!(interrupt);
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut interrupt => break,
        };
        let Some(line) = line else {
            return Ok(());
        };

        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => return Ok(()),
            Command::Help => eprintln!("{HELP}"),
            Command::Prompt(prompt) => {
                session.set_prompt(prompt)?;
                let outcome = tokio::select! {
                    outcome = generate(session, workflow) => outcome,
                    _ = &mut interrupt => break,
                };
                match outcome {
                    Ok(()) => {
                        if autoplay {
                            if let Err(error) = player::play(session) {
                                eprintln!("Error: {error}");
                            }
                        }
                        eprintln!("Use :play to watch it, :download to save it or :another to start over.");
                    }
                    Err(error) => eprintln!("Error: {error}"),
                }
            }
            Command::Image(path) => match session.attach_image(path) {
                Ok(()) => eprintln!("{}", describe(session)),
                Err(error) => eprintln!("Error: {error}"),
            },
            Command::ClearImage => {
                session.remove_image()?;
                eprintln!("{}", describe(session));
            }
            Command::Ratio(Some(ratio)) => {
                session.select_aspect_ratio(ratio)?;
                eprintln!("{}", describe(session));
            }
            Command::Ratio(None) => {
                session.cycle_aspect_ratio()?;
                eprintln!("{}", describe(session));
            }
            Command::Play => {
                if let Err(error) = player::play(session) {
                    eprintln!("Error: {error}");
                }
            }
            Command::Download => match session.download(output_dir).await {
                Ok(path) => eprintln!("Saved video to {}", path.display()),
                Err(error) => eprintln!("Error: {error}"),
            },
            Command::Another => {
                session.generate_another()?;
                eprintln!("{}", describe(session));
            }
            Command::Unknown(input) => eprintln!("Unknown command {input:?}, try :help"),
        }
    }

    eprintln!("Interrupted");
    // A cancelled generation leaves the session loading with nothing to release.
    if !session.is_loading() {
        session.generate_another()?;
    }
    Ok(())
}
