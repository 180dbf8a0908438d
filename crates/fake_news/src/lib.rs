pub mod api;
pub mod cli;
pub mod config;
pub mod gui;
pub mod predict;
pub mod preprocess;
pub mod service;
