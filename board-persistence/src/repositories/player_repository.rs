use anyhow::Result;
use board_types::{AuthIdentity, Player, PlayerId};
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, EntityTrait};
use tracing::info;

use crate::entities::{players, prelude::*};

pub(crate) fn player_from_model(model: players::Model) -> Player {
    Player {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        scores: Vec::new(),
    }
}

/// Insert a player row on any connection or transaction
pub(crate) async fn insert_player<C: ConnectionTrait>(
    conn: &C,
    id: PlayerId,
    email: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<players::Model> {
    let player_model = players::ActiveModel {
        id: ActiveValue::Set(id),
        email: ActiveValue::Set(email.trim().to_lowercase()),
        first_name: ActiveValue::Set(first_name.map(str::to_string)),
        last_name: ActiveValue::Set(last_name.map(str::to_string)),
        created_at: ActiveValue::Set(chrono::Utc::now().into()),
    };

    let saved = player_model.insert(conn).await?;
    info!("Created player {}", saved.id);
    Ok(saved)
}

pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>> {
        let player_model = Players::find_by_id(id).one(&self.db).await?;
        Ok(player_model.map(player_from_model))
    }

    pub async fn create_player(
        &self,
        id: PlayerId,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Player> {
        let saved = insert_player(&self.db, id, email, first_name, last_name).await?;
        Ok(player_from_model(saved))
    }

    /// Fetch the player for a signed-in identity, creating the row on first use
    pub async fn ensure_player(&self, identity: &AuthIdentity) -> Result<Player> {
        if let Some(player) = self.find_by_id(identity.id).await? {
            return Ok(player);
        }

        self.create_player(
            identity.id,
            identity.email.as_deref().unwrap_or_default(),
            identity.first_name.as_deref(),
            identity.last_name.as_deref(),
        )
        .await
    }
}
