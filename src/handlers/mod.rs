// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod content;
pub mod docs;
pub mod progress;
pub mod quiz;
