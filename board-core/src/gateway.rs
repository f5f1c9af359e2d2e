use async_trait::async_trait;
use board_types::{DailyScore, PlayerId, ScoreId};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("score {0} not found")]
    ScoreNotFound(ScoreId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for PersistenceError {
    fn from(err: anyhow::Error) -> Self {
        PersistenceError::Storage(err.to_string())
    }
}

/// A create-or-update request for one player's board on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertScore {
    /// None creates a new record, Some updates that record
    pub score_id: Option<ScoreId>,
    pub player_id: PlayerId,
    pub date: NaiveDate,
    pub answer: String,
    pub guesses: Vec<String>,
}

impl UpsertScore {
    pub fn is_create(&self) -> bool {
        self.score_id.is_none()
    }
}

/// System of record for daily scores
#[async_trait]
pub trait ScoreGateway: Send + Sync {
    async fn upsert_daily_score(&self, request: UpsertScore)
    -> Result<DailyScore, PersistenceError>;
}
