mod action;
mod conversation;
mod document;
mod event;
mod loading;
mod message;
mod role;
mod session;
mod slash_commands;
mod textarea;

pub use action::*;
pub use conversation::*;
pub use document::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use role::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
