mod app;
mod cli;
mod effects;
mod logging;
mod navigation;
mod persistence;
mod settings;
mod ui;

pub use app::run_app;
