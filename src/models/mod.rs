pub mod events;
pub mod game_state;
pub mod messages;

// Re-export important types
pub use events::*;
pub use game_state::*;
pub use messages::*;
