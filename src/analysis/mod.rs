//! Feature analysis through a hosted chat-completion model.
//!
//! A [`FeatureRequest`] is turned into a prompt, sent by [`AnalysisClient`],
//! and the reply is parsed into a [`FeatureAnalysis`](crate::models::FeatureAnalysis).
//! Failures at any step surface as [`AnalysisError`]; a half-parsed analysis
//! is never returned.

mod client;
mod config;
mod error;
mod parse;
pub mod prompt;
mod request;
pub mod types;

pub use client::AnalysisClient;
pub use config::{AnalysisConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::{AnalysisError, AnalysisResult};
pub use parse::{extract_json, parse_analysis};
pub use request::{validate_feature_name, Clarification, FeatureRequest, NameWarning};
