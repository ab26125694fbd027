pub mod config;
pub mod fetch;
pub mod output;
pub mod proficiency;
pub mod results;
