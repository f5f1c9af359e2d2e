use anyhow::Result;
use board_core::MonthKey;
use board_types::{PlayerId, Team, TeamId};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{daily_scores, players, prelude::*, team_players, teams};
use crate::repositories::player_repository::player_from_model;
use crate::repositories::score_repository::score_from_model;

pub struct TeamRepository {
    db: DatabaseConnection,
}

impl TeamRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_team(&self, name: &str, play_weekends: bool) -> Result<Team> {
        let team_model = teams::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name.to_string()),
            play_weekends: ActiveValue::Set(play_weekends),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        let saved = team_model.insert(&self.db).await?;
        info!("Created team {} ({})", saved.id, saved.name);

        Ok(Team {
            id: saved.id,
            name: saved.name,
            play_weekends: saved.play_weekends,
            players: Vec::new(),
        })
    }

    pub async fn is_member(&self, team_id: TeamId, player_id: PlayerId) -> Result<bool> {
        let membership = TeamPlayers::find_by_id((team_id, player_id))
            .one(&self.db)
            .await?;
        Ok(membership.is_some())
    }

    pub async fn add_member(&self, team_id: TeamId, player_id: PlayerId) -> Result<()> {
        if self.is_member(team_id, player_id).await? {
            debug!("Player {} already on team {}", player_id, team_id);
            return Ok(());
        }

        let membership = team_players::ActiveModel {
            team_id: ActiveValue::Set(team_id),
            player_id: ActiveValue::Set(player_id),
        };
        TeamPlayers::insert(membership)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Load a team with each member's boards for one month
    pub async fn find_team_month(&self, team_id: TeamId, month: MonthKey) -> Result<Option<Team>> {
        let Some(team) = Teams::find_by_id(team_id).one(&self.db).await? else {
            return Ok(None);
        };

        let member_ids: Vec<Uuid> = TeamPlayers::find()
            .filter(team_players::Column::TeamId.eq(team_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|membership| membership.player_id)
            .collect();

        let mut members: Vec<_> = Players::find()
            .filter(players::Column::Id.is_in(member_ids.clone()))
            .order_by_asc(players::Column::Email)
            .all(&self.db)
            .await?
            .into_iter()
            .map(player_from_model)
            .collect();

        let scores = DailyScores::find()
            .filter(daily_scores::Column::PlayerId.is_in(member_ids))
            .filter(daily_scores::Column::Date.between(month.first_day(), month.last_day()))
            .order_by_asc(daily_scores::Column::Date)
            .all(&self.db)
            .await?;

        for model in scores {
            let score = score_from_model(model)?;
            if let Some(player) = members.iter_mut().find(|p| p.id == score.player_id) {
                player.scores.push(score);
            }
        }

        Ok(Some(Team {
            id: team.id,
            name: team.name,
            play_weekends: team.play_weekends,
            players: members,
        }))
    }
}
