use thiserror::Error;

/// Guess rows on a Wordle board
pub const BOARD_ROWS: usize = 6;
/// Letters in a Wordle answer
pub const WORD_LENGTH: usize = 5;

/// Why a board cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardIssue {
    #[error("answer is empty")]
    MissingAnswer,
    #[error("no guesses entered")]
    NoGuesses,
    #[error("guess {index} has {actual} letters, expected {expected}")]
    GuessLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{count} guesses entered, at most six allowed")]
    TooManyGuesses { count: usize },
}

/// Check a board for submission.
///
/// Empty guess slots are padding and are skipped. Every other guess must have
/// as many letters as the answer.
pub fn check_board<S: AsRef<str>>(answer: &str, guesses: &[S]) -> Result<(), BoardIssue> {
    let expected = answer.chars().count();
    if expected == 0 {
        return Err(BoardIssue::MissingAnswer);
    }

    let mut played = 0;
    for (index, guess) in guesses.iter().enumerate() {
        let actual = guess.as_ref().chars().count();
        if actual == 0 {
            continue;
        }
        if actual != expected {
            return Err(BoardIssue::GuessLengthMismatch {
                index,
                expected,
                actual,
            });
        }
        played += 1;
    }

    match played {
        0 => Err(BoardIssue::NoGuesses),
        count if count > BOARD_ROWS => Err(BoardIssue::TooManyGuesses { count }),
        _ => Ok(()),
    }
}

pub fn board_is_valid<S: AsRef<str>>(answer: &str, guesses: &[S]) -> bool {
    check_board(answer, guesses).is_ok()
}

/// Pad (or cut) a guess list to exactly `rows` slots
pub fn pad_guesses(guesses: &[String], rows: usize) -> Vec<String> {
    let mut padded: Vec<String> = guesses.iter().take(rows).cloned().collect();
    padded.resize(rows, String::new());
    padded
}

/// Drop empty slots, keeping guess order
pub fn played_guesses(guesses: &[String]) -> Vec<String> {
    guesses
        .iter()
        .filter(|guess| !guess.is_empty())
        .cloned()
        .collect()
}

/// Stored form of an answer or guess
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_board() {
        assert!(board_is_valid("CRANE", &["SPADE", "", "", "", "", ""]));
        assert!(board_is_valid("crane", &["spade", "crane"]));
    }

    #[test]
    fn test_empty_guesses_invalid() {
        assert!(!board_is_valid("CRANE", &["", "", "", "", "", ""]));
        let none: [&str; 0] = [];
        assert_eq!(check_board("CRANE", &none), Err(BoardIssue::NoGuesses));
    }

    #[test]
    fn test_empty_answer_invalid() {
        assert!(!board_is_valid("", &["SPADE"]));
        assert_eq!(check_board("", &["SPADE"]), Err(BoardIssue::MissingAnswer));
    }

    #[test]
    fn test_length_mismatch_invalid() {
        assert_eq!(
            check_board("CRANE", &["SPADE", "SPA"]),
            Err(BoardIssue::GuessLengthMismatch {
                index: 1,
                expected: 5,
                actual: 3
            })
        );
        // answer shorter than the guess
        assert!(!board_is_valid("CRAN", &["SPADE"]));
        // answer longer than the guess
        assert!(!board_is_valid("CRANES", &["SPADE"]));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let guesses = ["SPADE", "CRANE", "", "", "", ""];
        let first = check_board("CRANE", &guesses);
        let second = check_board("CRANE", &guesses);
        assert_eq!(first, second);
        assert!(first.is_ok());
    }

    #[test]
    fn test_too_many_guesses() {
        let guesses = vec!["spade"; 7];
        assert_eq!(
            check_board("crane", &guesses),
            Err(BoardIssue::TooManyGuesses { count: 7 })
        );
    }

    #[test]
    fn test_pad_guesses() {
        let guesses = vec!["spade".to_string(), "crane".to_string()];
        let padded = pad_guesses(&guesses, BOARD_ROWS);
        assert_eq!(padded.len(), 6);
        assert_eq!(padded[0], "spade");
        assert_eq!(padded[1], "crane");
        assert!(padded[2..].iter().all(String::is_empty));

        let long = vec!["spade".to_string(); 8];
        assert_eq!(pad_guesses(&long, BOARD_ROWS).len(), 6);
    }

    #[test]
    fn test_played_guesses_skips_padding() {
        let guesses = pad_guesses(&["spade".to_string()], BOARD_ROWS);
        assert_eq!(played_guesses(&guesses), vec!["spade".to_string()]);
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  CRANE "), "crane");
    }
}
