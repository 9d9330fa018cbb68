pub mod application;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::*;
