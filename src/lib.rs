pub mod assign;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod orchestrator;
pub mod template;
pub mod validate;
