pub mod backend;
pub mod error;
pub mod generator;
mod ui;
