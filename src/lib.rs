pub mod config;
pub mod controllers;
pub mod errors;
pub mod library;
pub mod pruners;
#[cfg(test)]
mod testing;
pub mod train_log;
pub use anyhow;
