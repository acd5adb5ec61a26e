use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use veo_studio::Session;

/// Result screen: where the video lives and the prompt that produced it.
pub fn result_view(session: &Session) -> Option<String> {
    let video = session.video()?;
    Some(format!(
        "Your Generated Video\n  {} ({} bytes)\nPrompt: \"{}\"",
        video.path().display(),
        video.len(),
        session.last_prompt()
    ))
}

/// Opens the held video in the system's default player.
pub fn play(session: &Session) -> Result<()> {
    let video = session
        .video()
        .ok_or_else(|| eyre!("no generated video to play"))?;
    open_video(video.path())
}

pub fn open_video(path: &Path) -> Result<()> {
    open::that_detached(path).wrap_err_with(|| format!("Failed to open {} in a video player", path.display()))?;
    log::info!("Opened {} in the system player", path.display());
    Ok(())
}
