use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DailyScore, NEW_SCORE_SENTINEL, ScoreId};

/// Body of a board submission from the entry form
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpsertBoardRequest {
    #[serde(default)]
    pub score_id: Option<ScoreId>,
    pub date: NaiveDate,
    pub answer: String,
    pub guesses: Vec<String>,
}

impl UpsertBoardRequest {
    /// The record to update, or None when this submission creates one
    pub fn existing_score_id(&self) -> Option<ScoreId> {
        self.score_id
            .filter(|id| *id != NEW_SCORE_SENTINEL && *id > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpsertBoardResponse {
    pub success: bool,
    pub message: String,
    pub daily_score: Option<DailyScore>,
}
