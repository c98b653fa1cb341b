//! cm-representation: ASHRAE 205 RS0001 documents for chiller models.

pub mod document;
pub mod error;
pub mod id;
pub mod represent;
pub mod write;

pub use document::*;
pub use error::{RepresentationError, RepresentationResult};
pub use id::{document_id, seed_digest, uuid_from_seed};
pub use represent::{DocumentOptions, format_timestamp, rating_description, represent};
pub use write::{
    Format, file_name, read_document, to_json_string, to_yaml_string, write_document, write_json,
    write_yaml,
};
