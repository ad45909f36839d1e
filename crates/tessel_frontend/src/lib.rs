//! The boundary to the external HDL front end.
//!
//! Parsing and elaboration are another tool's job; that tool hands Tessel
//! its result as serialized [`Ast`] files (one elaborated design per file).
//! This crate loads them, applies the optional top-module filter, and drives
//! lowering; all input files build into one [`Tig`] through a shared
//! builder.

#![warn(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use tessel_ast::Ast;
use tessel_common::Interner;
use tessel_lower::{lower, LowerError};
use tessel_tig::{Tig, TigBuilder};

/// A front-end failure: bad invocation, unreadable or malformed input, or a
/// lowering failure bubbled up unchanged.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    /// `parse` was invoked with an empty file list.
    #[error("no input files provided")]
    NoInputFiles,

    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input file is not a valid elaborated design.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The offending path.
        path: PathBuf,
        /// The underlying deserialization error.
        source: serde_json::Error,
    },

    /// `--top` named a module that roots no hierarchy in any input file.
    #[error("top module `{name}` not found in any input file")]
    TopNotFound {
        /// The requested top module name.
        name: String,
    },

    /// The design was loaded but failed to lower.
    #[error(transparent)]
    Lower(#[from] LowerError),
}

/// Loads every input file and lowers it into one design.
///
/// With `top` set, only root instances of a definition with that name are
/// lowered; zero matches across all files is a failure. Any error aborts
/// the whole build and no design is returned.
pub fn parse_files(
    files: &[PathBuf],
    top: Option<&str>,
    interner: &Interner,
) -> Result<Tig, FrontendError> {
    if files.is_empty() {
        return Err(FrontendError::NoInputFiles);
    }

    let mut builder = TigBuilder::new(interner);
    let mut top_matched = false;

    for path in files {
        let mut ast = load_ast(path)?;
        if let Some(top_name) = top {
            let Ast { defns, top: roots } = &mut ast;
            roots.retain(|instance| {
                defns
                    .get(instance.defn)
                    .is_some_and(|defn| defn.name == top_name)
            });
            top_matched |= !roots.is_empty();
        }
        lower(&ast, interner, &mut builder)?;
    }

    if let Some(top_name) = top {
        if !top_matched {
            return Err(FrontendError::TopNotFound {
                name: top_name.to_string(),
            });
        }
    }

    Ok(builder.into_design())
}

fn load_ast(path: &Path) -> Result<Ast, FrontendError> {
    let text = fs::read_to_string(path).map_err(|source| FrontendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| FrontendError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
