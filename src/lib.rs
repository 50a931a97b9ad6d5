//! FeatureFit: feature prioritization with RICE scoring, risk assessment and
//! SWOT analysis produced by a chat-completion model.

pub mod analysis;
pub mod api;
pub mod models;
pub mod registry;
pub mod report;
