//! Tolka - Pivot-Routing Neural Text Translation
//!
//! Translates text through per-language-pair neural models, falling back
//! to a two-hop pivot through a bridge language when no direct model
//! exists. Models are loaded lazily and cached; routes whose models fail
//! to load are poisoned for the rest of the process lifetime.

pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod provider;
pub mod registry;
pub mod route;
pub mod service;
