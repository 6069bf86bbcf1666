pub mod actions;
mod app_state;
pub mod auth;
pub mod credentials;
pub mod events;
mod scroll;
mod transcript;

pub use app_state::*;
pub use scroll::*;
pub use transcript::*;
