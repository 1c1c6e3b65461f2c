pub mod app;
pub mod components;
pub mod input;
pub mod prompt;

pub use app::{run_app, GrowthApp};
pub use prompt::run_prompt;
