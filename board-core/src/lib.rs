pub mod answer_input;
pub mod board_entry;
pub mod board_validation;
pub mod gateway;
pub mod month;
pub mod scoring;

// Re-export main components
pub use answer_input::*;
pub use board_entry::*;
pub use board_validation::*;
pub use gateway::*;
pub use month::*;
pub use scoring::*;
