pub const DEFAULT_FILE_STEM: &str = "veo-generated-video";
pub const VIDEO_EXTENSION: &str = "mp4";

const MAX_STEM_CHARS: usize = 50;

/// File name a downloaded video is saved under, derived from its prompt.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, the result is
/// lowercased and cut to 50 characters. A prompt without a single
/// alphanumeric character falls back to [`DEFAULT_FILE_STEM`].
pub fn download_file_name(prompt: &str) -> String {
    let stem: String = if prompt.chars().any(|c| c.is_ascii_alphanumeric()) {
        prompt
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .take(MAX_STEM_CHARS)
            .collect()
    } else {
        DEFAULT_FILE_STEM.to_owned()
    };
    format!("{stem}.{VIDEO_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_becomes_underscores() {
        assert_eq!(download_file_name("A Lion's Roar!"), "a_lion_s_roar_.mp4");
    }

    #[test]
    fn symbols_only_falls_back() {
        assert_eq!(download_file_name("!!!"), "veo-generated-video.mp4");
        assert_eq!(download_file_name(""), "veo-generated-video.mp4");
        assert_eq!(download_file_name("日本語"), "veo-generated-video.mp4");
    }

    #[test]
    fn long_prompts_are_truncated() {
        let prompt = "Z".repeat(80);
        let name = download_file_name(&prompt);
        assert_eq!(name, format!("{}.mp4", "z".repeat(50)));
    }

    #[test]
    fn non_ascii_letters_are_replaced() {
        assert_eq!(download_file_name("Café 2"), "caf__2.mp4");
    }
}
