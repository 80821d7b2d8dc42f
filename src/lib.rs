pub mod api;
pub mod board;
pub mod config;
pub mod drafts;
pub mod errors;
pub mod form;
pub mod logging;
pub mod prompt;
pub mod repo;
pub mod task;
pub mod ui;
