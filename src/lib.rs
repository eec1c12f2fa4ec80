//! tokenforge - design-token build pipeline
//!
//! Loads Tokens Studio JSON, routes each token to a category by its declared
//! kind, and generates one Jetpack Compose object and one Swift enum per
//! category.

pub mod category;
pub mod cli;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod platform;
pub mod report;
