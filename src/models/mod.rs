// src/models/mod.rs

pub mod attempt;
pub mod content;
pub mod guidance;
pub mod progress;
pub mod question;
pub mod user;
