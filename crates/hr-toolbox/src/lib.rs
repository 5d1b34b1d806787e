//! Command-line front end for the draw engine: one-shot subcommands plus an
//! interactive session.

pub mod cli;
pub mod commands;
pub mod config;
pub mod repl;
pub mod reveal;
