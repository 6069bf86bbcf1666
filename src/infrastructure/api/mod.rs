mod client;
pub mod reply;
mod upload;

pub use client::*;
pub use upload::*;
