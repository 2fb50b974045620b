//! Document discovery and reading.
//!
//! Paths given on the command line may be files or directories; directories are walked
//! recursively and filtered by file extension.

use crate::engine::DocumentSource;
use crate::error::{Error, Result};
use crate::heading::DocumentId;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Expands `paths` into a sorted, de-duplicated list of matching documents.
///
/// Explicitly named files are kept whatever their extension; files found by walking a
/// directory must carry one of `extensions`. An empty `paths` means the current directory.
///
/// # Errors
///
/// Returns an error if a named path does not exist or a directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let mut documents = Vec::new();
    for root in roots {
        if root.is_dir() {
            walk(&root, extensions, &mut documents)?;
        } else if root.is_file() {
            documents.push(root);
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {}", root.display()),
            ));
        }
    }

    documents.sort();
    documents.dedup();
    Ok(documents)
}

fn walk(dir: &Path, extensions: &[String], documents: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, extensions, documents)?;
        } else if has_extension(&path, extensions) {
            documents.push(path);
        }
    }
    Ok(())
}

#[must_use]
/// Whether `path` ends in one of `extensions` (given without the leading dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Reads the full text of a document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::io(path, source))
}

#[derive(Clone, Copy, Debug, Default)]
/// Reads documents straight from the filesystem, treating the document id as a path.
pub struct FileSource;

impl DocumentSource for FileSource {
    fn read_text(&self, doc: &DocumentId) -> Result<String> {
        read_document(doc.as_path())
    }
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
