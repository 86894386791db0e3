pub mod args;
pub mod commands;
pub mod error;
pub mod input;
pub mod render;
