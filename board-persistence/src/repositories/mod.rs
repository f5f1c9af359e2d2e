pub mod invitation_repository;
pub mod player_repository;
pub mod score_repository;
pub mod team_repository;

pub use invitation_repository::InvitationRepository;
pub use player_repository::PlayerRepository;
pub use score_repository::ScoreRepository;
pub use team_repository::TeamRepository;
