//! Raw transcript cleaning and word counting.

/// Cleans raw conversational transcripts before planning and generation.
///
/// Removes bracketed annotations (`[laughter]`, `[00:12:03]`), leading
/// speaker labels (`Speaker 2:`), and collapses whitespace runs. Word
/// counts are whitespace-token counts over the cleaned text.
#[derive(Debug, Clone, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, raw: &str) -> String {
        let mut buffer = String::with_capacity(raw.len());

        for line in raw.lines() {
            let line = strip_speaker_label(line.trim());
            buffer.push_str(&strip_bracketed(line));
            buffer.push('\n');
        }

        buffer.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn count_words(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Remove `[...]` spans. Transcription tools use square brackets for
/// non-speech annotations and timestamps; parentheses stay untouched
/// since they carry real speech.
fn strip_bracketed(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }
    result
}

/// Strip a leading `Speaker N:` label if present.
fn strip_speaker_label(line: &str) -> &str {
    let Some(rest) = line
        .strip_prefix("Speaker ")
        .or_else(|| line.strip_prefix("speaker "))
    else {
        return line;
    };
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return line;
    }
    match rest[digits..].strip_prefix(':') {
        Some(content) => content.trim_start(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        let processor = TextPreprocessor::new();
        assert_eq!(
            processor.clean("hello   world\n\n  again"),
            "hello world again"
        );
    }

    #[test]
    fn test_clean_strips_annotations() {
        let processor = TextPreprocessor::new();
        assert_eq!(
            processor.clean("so [laughter] anyway [00:01:23] we continue"),
            "so anyway we continue"
        );
    }

    #[test]
    fn test_clean_strips_speaker_labels() {
        let processor = TextPreprocessor::new();
        assert_eq!(
            processor.clean("Speaker 1: welcome back\nSpeaker 2: thanks"),
            "welcome back thanks"
        );
    }

    #[test]
    fn test_clean_keeps_parentheses() {
        let processor = TextPreprocessor::new();
        assert_eq!(
            processor.clean("the result (roughly half) held"),
            "the result (roughly half) held"
        );
    }

    #[test]
    fn test_count_words() {
        let processor = TextPreprocessor::new();
        assert_eq!(processor.count_words("one two  three"), 3);
        assert_eq!(processor.count_words(""), 0);
    }

    #[test]
    fn test_annotation_removal_preserves_remaining_count() {
        let processor = TextPreprocessor::new();
        let cleaned = processor.clean("alpha [noise] beta gamma");
        assert_eq!(processor.count_words(&cleaned), 3);
    }

    #[test]
    fn test_speaker_label_requires_digits() {
        assert_eq!(strip_speaker_label("Speaker notes:"), "Speaker notes:");
        assert_eq!(strip_speaker_label("Speaker 12: hi"), "hi");
    }
}
