pub mod adapters;
pub mod config;
pub mod frequency;
pub mod generators;
pub mod runs;
pub mod scoring;
