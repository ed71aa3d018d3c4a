pub mod file;
pub mod news_api;
pub mod social;
