pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod done_store;
pub mod models;
pub mod service;
pub mod task_store;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use database::Database;
pub use models::{Done, Task, TaskInput, TaskWithCompletion};
pub use utils::Profile;
