pub mod auth;
pub mod client;
pub mod config;
pub mod quiz;

#[cfg(test)]
mod tests;
