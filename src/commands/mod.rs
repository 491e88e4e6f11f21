//! Chat commands: parsing, handling, and rendering.

pub mod handler;
pub mod parser;
pub mod render;

pub use handler::CommandHandler;
pub use parser::{AddRequest, Command, EditRequest, parse_add, parse_edit};
