pub mod guidance;
pub mod scoring;
