pub mod config;
pub mod diagrams;
pub mod generate;
