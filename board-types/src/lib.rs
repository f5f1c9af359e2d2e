pub mod auth;
pub mod messages;
pub mod score;
pub mod team;

// Re-export all types
pub use auth::*;
pub use messages::*;
pub use score::*;
pub use team::*;
