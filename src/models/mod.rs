//! Domain models for FeatureFit.
//!
//! # Core Concepts
//!
//! - [`Project`]: A named grouping of features sharing business context.
//! - [`Feature`]: A product capability under evaluation, carrying the last
//!   analysis payload returned by the model.
//! - [`FeatureAnalysis`]: Typed form of that payload (RICE, risks, MoSCoW,
//!   SWOT, roadmap, clarifying questions).
//! - [`RankedFeature`]: One row of a RICE comparison within a project.

mod analysis;
mod feature;
mod project;
mod ranking;

pub use analysis::*;
pub use feature::*;
pub use project::*;
pub use ranking::*;
