use std::time::Duration;

use veo_studio::Session;

pub const ROTATE_EVERY: Duration = Duration::from_secs(5);

const REASSURING_MESSAGES: [&str; 8] = [
    "Contacting the digital muses...",
    "Warming up the pixels...",
    "Teaching the AI about cinematography...",
    "This can take a few minutes, time for a quick stretch!",
    "Assembling bits and bytes into a masterpiece...",
    "Rendering your vision into reality...",
    "Patience is a virtue, especially with high-tech art!",
    "The AI is hard at work, great things take time.",
];

/// Loading display: the latest status plus a rotating reassuring message.
#[derive(Debug, Default)]
pub struct Indicator {
    status: Option<String>,
    message: usize,
}

impl Indicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &'static str {
        REASSURING_MESSAGES[self.message]
    }

    /// Advances to the next reassuring message, wrapping around.
    pub fn rotate(&mut self) -> &'static str {
        self.message = (self.message + 1) % REASSURING_MESSAGES.len();
        self.message()
    }

    /// Returns the status line to print when it changed since the last call.
    pub fn update(&mut self, session: &Session) -> Option<String> {
        let status = session.status().map(str::to_owned);
        if status.is_none() || status == self.status {
            return None;
        }
        self.status = status.clone();
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veo_studio::Progress;

    #[test]
    fn messages_rotate_and_wrap() {
        let mut indicator = Indicator::new();
        assert_eq!(indicator.message(), "Contacting the digital muses...");
        assert_eq!(indicator.rotate(), "Warming up the pixels...");
        for _ in 0..7 {
            indicator.rotate();
        }
        assert_eq!(indicator.message(), "Warming up the pixels...");
    }

    #[test]
    fn repeated_status_is_printed_once() {
        let mut indicator = Indicator::new();
        let mut session = Session::new();
        assert_eq!(indicator.update(&session), None);

        session.set_prompt("a lion").unwrap();
        session.begin().unwrap();
        assert_eq!(indicator.update(&session), None);

        session.record_progress(&Progress::Submitting);
        assert_eq!(
            indicator.update(&session).as_deref(),
            Some("Sending request to the model. This may take a moment...")
        );
        assert_eq!(indicator.update(&session), None);

        session.record_progress(&Progress::Finalizing);
        assert_eq!(indicator.update(&session).as_deref(), Some("Finalizing video..."));
    }
}
