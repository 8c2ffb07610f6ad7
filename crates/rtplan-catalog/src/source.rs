//! Where template documents come from.

use std::path::{Path, PathBuf};

use crate::error::CatalogError;

/// One template document found in a directory. A document that could not
/// be read carries its error so the catalog can log and skip it.
#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub contents: Result<String, CatalogError>,
}

/// Lists the template documents of one template directory.
///
/// Failing to list the directory itself is an error; failing to read one
/// document is reported through [`SourceFile::contents`].
pub trait TemplateSource {
    fn documents(&self, dir: &str) -> Result<Vec<SourceFile>, CatalogError>;
}

/// Reads `*.json` documents from a filesystem directory, in file-name order.
#[derive(Debug, Clone, Default)]
pub struct DirectorySource;

impl TemplateSource for DirectorySource {
    fn documents(&self, dir: &str) -> Result<Vec<SourceFile>, CatalogError> {
        let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::TemplateDir {
            dir: dir.to_string(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(err) => {
                    tracing::error!(dir, error = %err, "cannot read directory entry; skipped");
                    None
                }
            })
            .filter(|path| is_template_document(path))
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let contents = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
                    path: path.clone(),
                    source,
                });
                SourceFile {
                    name: path.display().to_string(),
                    contents,
                }
            })
            .collect())
    }
}

fn is_template_document(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
