use cm_models::ModelError;
use cm_project::ProjectError;
use cm_representation::RepresentationError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Representation(#[from] RepresentationError),

    #[error("Rating check failed for curve set {set}: {what}")]
    RatingCheck { set: &'static str, what: String },
}
