use board_types::{DailyScore, PlayerId, ScoreId, Team};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::answer_input::{EntryKey, apply_answer_key, clamp_guess};
use crate::board_validation::{
    BOARD_ROWS, BoardIssue, WORD_LENGTH, check_board, pad_guesses, played_guesses,
};
use crate::gateway::{PersistenceError, ScoreGateway, UpsertScore};

pub const SAVED_MESSAGE: &str = "Board saved";
pub const FAILED_MESSAGE: &str = "Failed to add or update board";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Idle,
    Submitting,
}

/// What the entry surface should show after a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submit was disabled, nothing was sent
    Ignored,
    Saved { message: String, score: DailyScore },
    Failed { message: String },
}

impl SubmitOutcome {
    /// Only a successful save closes the entry surface; a failure keeps the
    /// player's input on screen.
    pub fn closes_entry(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

/// In-progress edit of one player's board.
///
/// Holds a display copy of the player's team. The persisted record lives
/// behind a [`ScoreGateway`].
#[derive(Debug, Clone)]
pub struct BoardEntry {
    player_id: PlayerId,
    team: Team,
    date: NaiveDate,
    score_id: Option<ScoreId>,
    answer: String,
    guesses: Vec<String>,
    state: EntryState,
}

impl BoardEntry {
    pub fn new(player_id: PlayerId, team: Team, date: NaiveDate) -> Self {
        let mut entry = Self {
            player_id,
            team,
            date,
            score_id: None,
            answer: String::new(),
            guesses: pad_guesses(&[], BOARD_ROWS),
            state: EntryState::Idle,
        };
        entry.load_date(date);
        entry
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn score_id(&self) -> Option<ScoreId> {
        self.score_id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    /// Switch to another date, loading that day's saved board if there is one
    pub fn select_date(&mut self, date: NaiveDate) {
        if self.state == EntryState::Submitting {
            debug!("Ignoring date change while a submission is in flight");
            return;
        }
        self.load_date(date);
    }

    fn load_date(&mut self, date: NaiveDate) {
        self.date = date;

        let existing = self
            .team
            .player(self.player_id)
            .and_then(|player| player.score_on(date));

        match existing {
            Some(score) => {
                self.score_id = Some(score.id);
                self.answer = score.answer.clone();
                self.guesses = pad_guesses(&score.guesses, BOARD_ROWS);
            }
            None => {
                self.score_id = None;
                self.answer.clear();
                self.guesses = pad_guesses(&[], BOARD_ROWS);
            }
        }
    }

    /// Apply a key press to the answer field
    pub fn press_key(&mut self, key: EntryKey) -> bool {
        if self.state == EntryState::Submitting {
            return false;
        }
        apply_answer_key(&mut self.answer, key)
    }

    pub fn clear_answer(&mut self) {
        if self.state == EntryState::Idle {
            self.answer.clear();
        }
    }

    /// Replace the text of one guess slot. Guesses are capped at the answer's
    /// length, or the standard word length while no answer is entered.
    pub fn set_guess(&mut self, index: usize, text: &str) -> bool {
        if self.state == EntryState::Submitting || index >= self.guesses.len() {
            return false;
        }

        let max_len = match self.answer.chars().count() {
            0 => WORD_LENGTH,
            len => len,
        };
        self.guesses[index] = clamp_guess(text, max_len);
        true
    }

    pub fn validate(&self) -> Result<(), BoardIssue> {
        check_board(&self.answer, &self.guesses)
    }

    pub fn can_submit(&self) -> bool {
        self.state == EntryState::Idle && self.validate().is_ok()
    }

    /// Move to `Submitting` and build the gateway request.
    /// Returns None, leaving the state untouched, when submit is disabled.
    pub fn begin_submit(&mut self) -> Option<UpsertScore> {
        if self.state == EntryState::Submitting {
            debug!("Submit ignored: already submitting");
            return None;
        }
        if let Err(issue) = self.validate() {
            debug!("Submit ignored: {}", issue);
            return None;
        }

        self.state = EntryState::Submitting;
        Some(UpsertScore {
            score_id: self.score_id,
            player_id: self.player_id,
            date: self.date,
            answer: self.answer.clone(),
            guesses: played_guesses(&self.guesses),
        })
    }

    /// Resolve an in-flight submission and return to `Idle`
    pub fn complete_submit(
        &mut self,
        result: Result<DailyScore, PersistenceError>,
    ) -> SubmitOutcome {
        if self.state != EntryState::Submitting {
            warn!("Received a submit result with no submission in flight");
            return SubmitOutcome::Ignored;
        }
        self.state = EntryState::Idle;

        match result {
            Ok(score) => {
                info!("Saved board {} for {}", score.id, score.date);
                self.score_id = Some(score.id);
                if !self.team.update_player_score(self.player_id, score.clone()) {
                    warn!(
                        "Player {} is not on team {}, cached scores not updated",
                        self.player_id, self.team.id
                    );
                }
                SubmitOutcome::Saved {
                    message: SAVED_MESSAGE.to_string(),
                    score,
                }
            }
            Err(err) => {
                warn!("Failed to save board for {}: {}", self.date, err);
                SubmitOutcome::Failed {
                    message: FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Submit through a gateway in one step
    pub async fn submit<G: ScoreGateway + ?Sized>(&mut self, gateway: &G) -> SubmitOutcome {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Ignored;
        };
        let result = gateway.upsert_daily_score(request).await;
        self.complete_submit(result)
    }
}
