pub mod binding;
pub mod config;
pub mod control;
pub mod error;
pub mod form;
pub mod preferences;
pub mod setting;
pub mod tui;

#[cfg(test)]
mod testing;
