//! Main module for bst library functionality

pub mod config;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod incremental;
pub mod lexing;
pub mod location;
pub mod outline;
pub mod parsing;
pub mod syntax;
pub mod testing;
pub mod token;
