pub mod attempt;
pub mod backend;
pub mod error;
pub mod models;
pub mod navigator;
pub mod selection;
pub mod session;
pub mod submission;
pub mod timer;
pub mod view;
