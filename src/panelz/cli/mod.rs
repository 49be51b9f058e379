//! # CLI
//!
//! One possible UI client for panelz, and the only place that knows about
//! terminal I/O, prompts and exit codes.
//!
//! ## Context
//!
//! - Data directory: `$PANELZ_DATA`, else the platform data dir for `panelz`.
//! - Identity endpoint: `$PANELZ_IDENTITY_URL`, else `identity-url` from config.
//! - Logging: `$PANELZ_LOG` (an `EnvFilter` directive, default `warn`); `-v`
//!   switches to `debug`. Logs go to stderr so stdout stays clean.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context wiring and per-command handlers
//! - `render`: tables, colors and messages

pub mod commands;
pub mod render;
pub mod setup;

pub use commands::run;
