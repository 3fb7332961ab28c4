//! HTTP request handlers

pub mod calculate;
pub mod common;
pub mod download;
pub mod health;
pub mod progress;
