pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod conversation_manager;
pub mod events;
mod scroll;
mod session_controller;
mod upload_manager;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation_manager::*;
pub use scroll::*;
pub use session_controller::*;
pub use upload_manager::*;
