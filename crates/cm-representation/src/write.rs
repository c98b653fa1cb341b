//! Reading and writing documents.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Rs0001Document;
use crate::error::{RepresentationError, RepresentationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> RepresentationResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(RepresentationError::InvalidDocument {
                what: format!("unknown document extension: {}", path.display()),
            }),
        }
    }
}

/// `{stem}.RS0001.a205.{ext}`
pub fn file_name(stem: &str, format: Format) -> String {
    format!("{stem}.RS0001.a205.{}", format.extension())
}

pub fn to_json_string(document: &Rs0001Document) -> RepresentationResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn to_yaml_string(document: &Rs0001Document) -> RepresentationResult<String> {
    Ok(serde_yaml::to_string(document)?)
}

pub fn write_json(document: &Rs0001Document, path: &Path) -> RepresentationResult<()> {
    fs::write(path, to_json_string(document)?)?;
    Ok(())
}

pub fn write_yaml(document: &Rs0001Document, path: &Path) -> RepresentationResult<()> {
    fs::write(path, to_yaml_string(document)?)?;
    Ok(())
}

/// Write `document` into `dir` (created if missing) and return the path.
pub fn write_document(
    document: &Rs0001Document,
    dir: &Path,
    stem: &str,
    format: Format,
) -> RepresentationResult<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(file_name(stem, format));
    match format {
        Format::Json => write_json(document, &path)?,
        Format::Yaml => write_yaml(document, &path)?,
    }
    Ok(path)
}

pub fn read_document(path: &Path) -> RepresentationResult<Rs0001Document> {
    let content = fs::read_to_string(path)?;
    Ok(match Format::from_path(path)? {
        Format::Json => serde_json::from_str(&content)?,
        Format::Yaml => serde_yaml::from_str(&content)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_formats() {
        assert_eq!(
            file_name("ASHRAE90-1-2022-AppJ-Curve-Set-D", Format::Json),
            "ASHRAE90-1-2022-AppJ-Curve-Set-D.RS0001.a205.json"
        );
        assert_eq!(
            Format::from_path(Path::new("a/b.RS0001.a205.yml")).unwrap(),
            Format::Yaml
        );
        assert!(Format::from_path(Path::new("b.cbor")).is_err());
    }
}
