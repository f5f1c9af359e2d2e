pub use super::daily_scores::Entity as DailyScores;
pub use super::invitations::Entity as Invitations;
pub use super::players::Entity as Players;
pub use super::team_players::Entity as TeamPlayers;
pub use super::teams::Entity as Teams;
