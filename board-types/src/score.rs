use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type ScoreId = i32;
pub type PlayerId = Uuid;
pub type TeamId = i32;

/// Score id the entry form sends for a board that has never been saved.
pub const NEW_SCORE_SENTINEL: ScoreId = -1;

/// One player's recorded board for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyScore {
    pub id: ScoreId,
    pub player_id: PlayerId,
    pub date: NaiveDate,
    pub answer: String,
    pub guesses: Vec<String>,
}

impl DailyScore {
    /// The guesses that were actually played, skipping padding slots
    pub fn played_guesses(&self) -> impl Iterator<Item = &str> {
        self.guesses
            .iter()
            .map(String::as_str)
            .filter(|guess| !guess.is_empty())
    }
}

/// Monthly totals for one team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerMonthSummary {
    pub player_id: PlayerId,
    pub display_name: String,
    pub boards_played: u32,
    pub boards_solved: u32,
    pub total_score: u32,
    pub average_score: Option<f64>,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TeamMonthSummary {
    pub team_id: TeamId,
    pub team_name: String,
    pub month: String, // yyyyMM
    pub players: Vec<PlayerMonthSummary>,
}
