use crate::board_validation::WORD_LENGTH;

/// A key press delivered to the answer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey {
    Letter(char),
    Backspace,
    Delete,
    Other,
}

impl EntryKey {
    /// Map a browser `KeyboardEvent.key` name
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Backspace" => EntryKey::Backspace,
            "Delete" => EntryKey::Delete,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii_alphabetic() => EntryKey::Letter(ch),
                    _ => EntryKey::Other,
                }
            }
        }
    }
}

/// Apply one key press to the answer. Returns whether the answer changed.
pub fn apply_answer_key(answer: &mut String, key: EntryKey) -> bool {
    match key {
        EntryKey::Letter(ch) => {
            if answer.chars().count() >= WORD_LENGTH {
                return false;
            }
            answer.push(ch.to_ascii_lowercase());
            true
        }
        EntryKey::Backspace | EntryKey::Delete => answer.pop().is_some(),
        EntryKey::Other => false,
    }
}

/// Clean up text typed into a guess field: letters only, lower case, at most
/// `max_len` characters.
pub fn clamp_guess(text: &str, max_len: usize) -> String {
    text.chars()
        .filter(|ch| ch.is_ascii_alphabetic())
        .map(|ch| ch.to_ascii_lowercase())
        .take(max_len)
        .collect()
}
