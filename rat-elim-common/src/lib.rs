//! Internal modules for rat-elim

pub mod config;
#[macro_use]
pub mod macros;
#[macro_use]
pub mod memory;
pub mod output;
pub mod input;
pub mod literal;
pub mod clause;
pub mod error;
pub mod proof;
pub mod purity;
pub mod distribution;
pub mod finalization;
pub mod elimination;
pub mod emission;
pub mod parser;
pub mod rupcheck;
pub mod stats;
