mod action;
mod backend;
mod error;
mod event;
mod loading;
mod notice;
mod session;
mod slash_commands;
mod textarea;
mod turn;
mod upload;

pub use action::*;
pub use backend::*;
pub use error::*;
pub use event::*;
pub use loading::*;
pub use notice::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
pub use turn::*;
pub use upload::*;
