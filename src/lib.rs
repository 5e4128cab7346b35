//! Chat bot plugin that replies with a random meme scraped from
//! m.cuantarazon.com or m.cuantocabron.com.

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod extension;
pub mod fetcher;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod retriever;
pub mod scrape;
pub mod settings;
