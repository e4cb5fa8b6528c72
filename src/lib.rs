pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fetch;
pub mod html;
pub mod parser;
pub mod render;
pub mod services;
pub mod sources;
pub mod storage;
