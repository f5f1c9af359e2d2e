use anyhow::Result;
use async_trait::async_trait;
use board_core::{normalize_word, PersistenceError, ScoreGateway, UpsertScore};
use board_types::{DailyScore, PlayerId, ScoreId};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::{info, warn};

use crate::entities::{daily_scores, prelude::*};

pub(crate) fn score_from_model(model: daily_scores::Model) -> Result<DailyScore> {
    let guesses: Vec<String> = serde_json::from_value(model.guesses)?;
    Ok(DailyScore {
        id: model.id,
        player_id: model.player_id,
        date: model.date,
        answer: model.answer,
        guesses,
    })
}

fn stored_guesses(guesses: &[String]) -> Result<serde_json::Value> {
    let normalized: Vec<String> = guesses
        .iter()
        .map(|guess| normalize_word(guess))
        .filter(|guess| !guess.is_empty())
        .collect();
    Ok(serde_json::to_value(normalized)?)
}

pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: ScoreId) -> Result<Option<DailyScore>> {
        DailyScores::find_by_id(id)
            .one(&self.db)
            .await?
            .map(score_from_model)
            .transpose()
    }

    pub async fn find_by_player(&self, player_id: PlayerId) -> Result<Vec<DailyScore>> {
        DailyScores::find()
            .filter(daily_scores::Column::PlayerId.eq(player_id))
            .order_by_asc(daily_scores::Column::Date)
            .all(&self.db)
            .await?
            .into_iter()
            .map(score_from_model)
            .collect()
    }

    pub async fn create_score(&self, request: &UpsertScore) -> Result<DailyScore> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let score_model = daily_scores::ActiveModel {
            id: ActiveValue::NotSet,
            player_id: ActiveValue::Set(request.player_id),
            date: ActiveValue::Set(request.date),
            answer: ActiveValue::Set(normalize_word(&request.answer)),
            guesses: ActiveValue::Set(stored_guesses(&request.guesses)?),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let saved = score_model.insert(&self.db).await?;
        info!(
            "Created daily score {} for player {} on {}",
            saved.id, saved.player_id, saved.date
        );
        score_from_model(saved)
    }

    /// Update answer and guesses of a record owned by the requesting player.
    /// Returns None when no such record exists for that player.
    pub async fn update_score(
        &self,
        score_id: ScoreId,
        request: &UpsertScore,
    ) -> Result<Option<DailyScore>> {
        let Some(existing) = DailyScores::find_by_id(score_id).one(&self.db).await? else {
            return Ok(None);
        };
        if existing.player_id != request.player_id {
            warn!(
                "Player {} tried to update score {} owned by {}",
                request.player_id, score_id, existing.player_id
            );
            return Ok(None);
        }

        let mut active: daily_scores::ActiveModel = existing.into();
        active.answer = ActiveValue::Set(normalize_word(&request.answer));
        active.guesses = ActiveValue::Set(stored_guesses(&request.guesses)?);
        active.updated_at = ActiveValue::Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        info!("Updated daily score {}", updated.id);
        score_from_model(updated).map(Some)
    }

    /// Absent id creates, a concrete id updates
    pub async fn upsert_score(
        &self,
        request: &UpsertScore,
    ) -> Result<DailyScore, PersistenceError> {
        match request.score_id {
            None => Ok(self.create_score(request).await?),
            Some(score_id) => self
                .update_score(score_id, request)
                .await?
                .ok_or(PersistenceError::ScoreNotFound(score_id)),
        }
    }
}

#[async_trait]
impl ScoreGateway for ScoreRepository {
    async fn upsert_daily_score(
        &self,
        request: UpsertScore,
    ) -> Result<DailyScore, PersistenceError> {
        self.upsert_score(&request).await
    }
}
