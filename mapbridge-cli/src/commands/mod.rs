//! CLI subcommands.

pub mod common;
pub mod config;
pub mod copy_maps;
pub mod policy;
pub mod session;
