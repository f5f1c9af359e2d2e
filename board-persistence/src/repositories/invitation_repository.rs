use anyhow::{anyhow, Result};
use board_types::{AuthIdentity, TeamId};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{invitations, prelude::*, team_players};
use crate::repositories::player_repository::insert_player;

pub struct InvitationRepository {
    db: DatabaseConnection,
}

impl InvitationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_invitation(&self, team_id: TeamId, email: &str) -> Result<i32> {
        let invitation = invitations::ActiveModel {
            id: ActiveValue::NotSet,
            team_id: ActiveValue::Set(team_id),
            email: ActiveValue::Set(email.trim().to_lowercase()),
            accepted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        let saved = invitation.insert(&self.db).await?;
        Ok(saved.id)
    }

    pub async fn pending_for_email(&self, email: &str) -> Result<Vec<invitations::Model>> {
        let pending = Invitations::find()
            .filter(invitations::Column::Email.eq(email.trim().to_lowercase()))
            .filter(invitations::Column::AcceptedAt.is_null())
            .all(&self.db)
            .await?;
        Ok(pending)
    }

    /// Complete an invited signup: make sure the player exists, join every
    /// team with a pending invitation for the email and mark those accepted.
    /// Returns the joined team ids. Fails when nothing is pending.
    pub async fn finalize_invitation(&self, identity: &AuthIdentity) -> Result<Vec<TeamId>> {
        let player_id = identity.id;
        let email = identity
            .email
            .as_deref()
            .map(|email| email.trim().to_lowercase())
            .ok_or_else(|| anyhow!("Invited identity {} has no email", player_id))?;
        let txn = self.db.begin().await?;

        let pending = Invitations::find()
            .filter(invitations::Column::Email.eq(email.as_str()))
            .filter(invitations::Column::AcceptedAt.is_null())
            .all(&txn)
            .await?;
        if pending.is_empty() {
            return Err(anyhow!("No pending invitation for {}", email));
        }

        if Players::find_by_id(player_id).one(&txn).await?.is_none() {
            insert_player(
                &txn,
                player_id,
                &email,
                identity.first_name.as_deref(),
                identity.last_name.as_deref(),
            )
            .await?;
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let mut joined = Vec::new();
        for invitation in pending {
            let team_id = invitation.team_id;
            let already_member = TeamPlayers::find_by_id((team_id, player_id))
                .one(&txn)
                .await?
                .is_some();
            if !already_member {
                let membership = team_players::ActiveModel {
                    team_id: ActiveValue::Set(team_id),
                    player_id: ActiveValue::Set(player_id),
                };
                TeamPlayers::insert(membership)
                    .exec_without_returning(&txn)
                    .await?;
            }

            let mut accepted: invitations::ActiveModel = invitation.into();
            accepted.accepted_at = ActiveValue::Set(Some(now));
            accepted.update(&txn).await?;
            joined.push(team_id);
        }

        txn.commit().await?;
        info!("Player {} joined teams {:?} from invitation", player_id, joined);
        Ok(joined)
    }
}
