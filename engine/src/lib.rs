pub mod actions;
pub mod combat;
pub mod map;
pub mod pathfind;
pub mod policy;
pub mod rules;
pub mod setup;
pub mod strength;
pub mod turn;
pub mod types;


pub use actions::{apply, ActionError, ActionResult, GameAction};
pub use map::{LOCATIONS, ROADS};
pub use types::*;
