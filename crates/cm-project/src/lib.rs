//! cm-project: chiller definition files, validation, and model resolution.
//!
//! A project lists chillers either by their full performance description
//! (`type: Custom`) or as an ASHRAE 90.1 baseline (`type: Baseline`).
//! Quantities carry their unit label and are converted when resolved.

pub mod resolve;
pub mod schema;
pub mod validate;

pub use resolve::{ResolvedChiller, resolve_chiller};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_chiller, validate_project};

use cm_models::ModelError;
use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Unknown chiller: {id}")]
    UnknownChiller { id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectDef {
    pub fn chiller(&self, id: &str) -> ProjectResult<&ChillerDef> {
        self.chillers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ProjectError::UnknownChiller { id: id.to_string() })
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<ProjectDef> {
    let content = std::fs::read_to_string(path)?;
    let project: ProjectDef = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &ProjectDef) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ProjectDef> {
    let content = std::fs::read_to_string(path)?;
    let project: ProjectDef = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &Path, project: &ProjectDef) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &Path) -> ProjectResult<ProjectDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
