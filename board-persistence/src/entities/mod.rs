pub mod prelude;

pub mod daily_scores;
pub mod invitations;
pub mod players;
pub mod team_players;
pub mod teams;
