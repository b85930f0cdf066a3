use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::document::LoadedDocument;
use crate::io::{Format, IoError, reader};

/// Failure of a single load call. Any one file failing fails the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to resolve `{pattern}`: {source}")]
    Resolve {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    #[error("failed to open `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} file `{path}`: {source}")]
    Parse {
        path: String,
        format: Format,
        #[source]
        source: IoError,
    },
}

/// Expands `pattern` into the regular files it matches, sorted lexicographically.
///
/// A literal path is a pattern without wildcards. No match is not an error.
pub fn resolve_paths(pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    let entries = glob::glob(pattern).map_err(|source| LoadError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| LoadError::Resolve {
            pattern: pattern.to_string(),
            source,
        })?;
        if path.is_dir() {
            debug!(path = %path.display(), "skipping directory match");
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

/// Resolves `pattern` and parses every matched file in parallel.
///
/// The returned documents follow resolution order. Any failure fails the
/// whole load; no partial list is returned.
pub fn load_documents(pattern: &str, format: Format) -> Result<Vec<LoadedDocument>, LoadError> {
    info!(pattern, %format, "loading documents");
    let paths = resolve_paths(pattern)?;
    debug!(pattern, matched = paths.len(), "resolved documents");

    paths
        .par_iter()
        .map(|path| load_document(path, format))
        .collect()
}

fn load_document(path: &Path, format: Format) -> Result<LoadedDocument, LoadError> {
    let identifier = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: identifier.clone(),
        source,
    })?;
    let content =
        reader::read_document(BufReader::new(file), format).map_err(|source| LoadError::Parse {
            path: identifier.clone(),
            format,
            source,
        })?;
    Ok(LoadedDocument::new(identifier, content))
}
