// src/lib.rs

//! postwatch library
//!
//! Monitors social media accounts for new posts and dispatches
//! notifications for anything not seen before.

pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
