//! CLI command implementations for procclean.
//!
//! - `list`: filtered, sorted process listing
//! - `groups`: processes sharing an executable
//! - `kill`: terminate by pid or filter, with preview and confirmation
//! - `memory`: system memory summary

pub mod groups;
pub mod kill;
pub mod list;
pub mod memory;

pub use groups::command_groups;
pub use kill::command_kill;
pub use list::command_list;
pub use memory::command_memory;
