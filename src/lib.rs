pub mod config;
pub mod engine;
pub mod feed;
pub mod model;
pub mod pipeline;
pub mod publish;
