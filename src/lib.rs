#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod scrape;
pub mod util;
