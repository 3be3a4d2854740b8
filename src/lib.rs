#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod ingest;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod util;
