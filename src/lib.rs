//! Migration scanner that matches legacy patterns in a codebase, correlates
//! them with research, scores the risk and builds a phased plan.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;

pub use crate::core::Engine;
pub use crate::error::{Result, StackshiftError};
