use crate::shared::constants::TRIGGER_WORD;

/// Extract a target name from a transcribed utterance.
///
/// The utterance must begin with the trigger word (case-insensitive, as its
/// own token); the remainder becomes the target name. Trailing punctuation
/// is stripped since recognizers tend to append it. Utterances without the
/// trigger word yield `None` and leave the current target untouched.
pub fn parse_target_command(utterance: &str) -> Option<String> {
    let trimmed = utterance.trim();
    let (first, rest) = trimmed.split_once(char::is_whitespace)?;
    if !first.eq_ignore_ascii_case(TRIGGER_WORD) {
        return None;
    }
    let name = rest.trim().trim_end_matches(['.', ',', '!', '?']).trim_end();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("track bottle", "bottle")]
    #[case("Track bottle", "bottle")]
    #[case("TRACK cell phone", "cell phone")]
    #[case("  track   dog  ", "dog")]
    #[case("Track bottle.", "bottle")]
    #[case("track the remote!", "the remote")]
    fn test_trigger_word_extracts_remainder(#[case] utterance: &str, #[case] expected: &str) {
        assert_eq!(parse_target_command(utterance), Some(expected.to_string()));
    }

    #[rstest]
    #[case("please find a bottle")]
    #[case("bottle")]
    #[case("track")]
    #[case("track   ")]
    #[case("tracking bottle")]
    #[case("")]
    fn test_non_commands_yield_nothing(#[case] utterance: &str) {
        assert_eq!(parse_target_command(utterance), None);
    }
}
