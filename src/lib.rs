#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod favorites;
pub mod favorites_store;
pub mod logging;
pub mod model;
pub mod shell;
pub mod views;
