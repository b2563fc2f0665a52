//! Command-line interface for BeeWi SmartLite bulbs.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Scan for nearby bulbs |
//! | `status` | Show current settings |
//! | `info` | Show hardware information |
//! | `on` / `off` | Switch the bulb on or off |
//! | `brightness <0-9>` | Set brightness |
//! | `temperature <0-9>` | Set white temperature |
//! | `white` | Switch to white mode |
//! | `color <r,g,b\|#rrggbb>` | Set an RGB colour |
//! | `sequence <0-4>` | Start a built-in colour sequence |
//! | `config` | Manage CLI configuration |
//! | `alias` | Manage friendly bulb names |
//! | `completions` | Generate shell completions |
//!
//! Every command that talks to a bulb connects, reads the bulb's status,
//! performs its work and disconnects again.
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/beewi/config.toml` (or platform equivalent):
//!
//! - `device`: Default bulb address or alias
//! - `timeout`: Connection timeout in seconds
//! - `no_color`: Disable colored output
//! - `aliases`: Friendly name to address table
//!
//! # Environment Variables
//!
//! - `BEEWI_DEVICE`: Default bulb address (overridden by `--device` flag)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! ```bash
//! beewi scan
//! beewi on --device AA:BB:CC:DD:EE:FF
//! beewi color "#ff8000" --device desk
//! beewi --json status
//! ```

// The binary lives in main.rs; this library only re-exports the crates it drives.
pub use beewi_core;
pub use beewi_types;
