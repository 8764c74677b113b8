//! Main module for forsure library functionality

pub mod ast;
pub mod defaults;
pub mod diff;
pub mod editing;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod testing;
