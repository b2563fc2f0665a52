//! Command implementations for the CLI.

mod alias;
mod config;
mod control;
mod info;
mod scan;
mod status;

pub use alias::cmd_alias;
pub use config::cmd_config;
pub use control::{Action, cmd_control};
pub use info::cmd_info;
pub use scan::cmd_scan;
pub use status::cmd_status;
