//! Terminal front-end for the single-ticker price dashboard.
//!
//! [`pipeline::run`] is the whole program in one call; the other modules
//! collect its inputs ([`cli`], [`config`]) and present its output
//! ([`render`], [`export`]).

pub mod cli;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod render;
