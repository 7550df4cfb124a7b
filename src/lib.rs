pub mod config;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod merge;
pub mod pipeline;
pub mod process;
