//! In-memory registry of projects and their features.
//!
//! The registry is the single source of truth for "does a project with this
//! name exist". It is transient: one instance per running session, nothing is
//! persisted. Operations are synchronous and take `&mut self` for mutation;
//! share it across request handlers through [`SharedRegistry`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use thiserror::Error;

use crate::models::*;

/// Registry errors. Absence is never an error; lookups return `Option`/`bool`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Project '{0}' already exists")]
    DuplicateName(String),
}

/// A registry shared between request handlers. Every mutating operation must
/// run under the lock.
pub type SharedRegistry = Arc<Mutex<Registry>>;

#[derive(Debug, Default)]
pub struct Registry {
    projects: HashMap<String, Project>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    // ============================================================
    // Project operations
    // ============================================================

    /// Create and store an empty project. Fails if the name is taken; the
    /// existing project is left untouched.
    pub fn create_project(&mut self, input: CreateProjectInput) -> Result<&Project, RegistryError> {
        use std::collections::hash_map::Entry;

        match self.projects.entry(input.name.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!("Rejected duplicate project name: {}", input.name);
                Err(RegistryError::DuplicateName(input.name))
            }
            Entry::Vacant(slot) => {
                tracing::debug!("Created project: {}", input.name);
                Ok(slot.insert(Project::new(input)))
            }
        }
    }

    pub fn get_project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn get_project_mut(&mut self, name: &str) -> Option<&mut Project> {
        self.projects.get_mut(name)
    }

    /// All project names, sorted alphabetically.
    pub fn list_projects(&self) -> Vec<String> {
        let mut names: Vec<String> = self.projects.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Remove a project and, with it, all of its features.
    pub fn delete_project(&mut self, name: &str) -> bool {
        let removed = self.projects.remove(name).is_some();
        if removed {
            tracing::debug!("Deleted project: {}", name);
        }
        removed
    }

    // ============================================================
    // Feature operations
    // ============================================================

    /// Append a feature to a project. Returns false, without mutating
    /// anything, when the project does not exist.
    pub fn add_feature_to_project(&mut self, project_name: &str, feature: Feature) -> bool {
        match self.projects.get_mut(project_name) {
            Some(project) => {
                tracing::debug!("Added feature '{}' to project '{}'", feature.name, project_name);
                project.add_feature(feature);
                true
            }
            None => false,
        }
    }

    /// The project's features in insertion order; empty when the project
    /// does not exist.
    pub fn get_project_features(&self, project_name: &str) -> &[Feature] {
        self.projects
            .get(project_name)
            .map(|p| p.features.as_slice())
            .unwrap_or(&[])
    }

    /// Store an analysis payload on a feature. Returns false when either the
    /// project or the feature does not exist.
    pub fn set_feature_analysis(
        &mut self,
        project_name: &str,
        feature_name: &str,
        payload: Value,
    ) -> bool {
        self.projects
            .get_mut(project_name)
            .is_some_and(|p| p.set_feature_analysis(feature_name, payload))
    }

    /// Rank a project's analyzed features by RICE score, highest first.
    ///
    /// Features without a well-formed `rice_scores` payload are skipped.
    /// The sort is stable, so features with equal scores keep their
    /// insertion order.
    pub fn compare_features(&self, project_name: &str) -> Vec<RankedFeature> {
        let mut ranked: Vec<RankedFeature> = self
            .get_project_features(project_name)
            .iter()
            .filter_map(RankedFeature::from_feature)
            .collect();

        ranked.sort_by(|a, b| b.rice_score.total_cmp(&a.rice_score));
        ranked
    }
}
