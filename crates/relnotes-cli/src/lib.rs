//! # relnotes-cli
//!
//! Command-line front end for release-note changelogs:
//! - listing, showing, and searching releases
//! - validating ordering and completeness
//! - canonical reformatting
//! - adding the next release at the top
//! - managing the TOML configuration

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use cli::{Cli, Command, ConfigAction};
pub use commands::{Context, Outcome, run};
pub use config::RelnotesConfig;
pub use error::{Error, Result};
