use cm_models::ModelError;

pub type RepresentationResult<T> = Result<T, RepresentationError>;

#[derive(thiserror::Error, Debug)]
pub enum RepresentationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid document: {what}")]
    InvalidDocument { what: String },
}
