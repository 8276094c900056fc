// src/lib.rs

//! Catalog sources library

pub mod adapter;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod themes;
pub mod utils;

pub use error::{AppError, Result};
pub use pipeline::Source;
