//! Module loading
//!
//! Discovers the `.tf` files of a module directory and parses them into
//! [`crate::ast::File`] trees ready for [`crate::Doc::create`].

pub mod parser;
pub mod walker;

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::ast::File;
use crate::error::Result;

pub use parser::HclParser;
pub use walker::ModuleWalker;

/// Parsed files keyed by file name
pub type FileSet = BTreeMap<String, File>;

/// Parse every `.tf` file of the module at `path`.
///
/// Files are parsed in parallel; the first failure aborts the load.
pub fn load_module(path: &Path) -> Result<FileSet> {
    let files = ModuleWalker::new().walk(path)?;
    info!("Found {} files in {}", files.len(), path.display());

    let parsed: Vec<(String, File)> = files
        .par_iter()
        .map(|file| -> Result<(String, File)> {
            let parser = HclParser::new();
            let tree = parser.parse_file(file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            debug!("Parsed {}", file.display());
            Ok((name, tree))
        })
        .collect::<Result<_>>()?;

    Ok(parsed.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_module_keys_by_file_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("variables.tf"), "variable \"a\" {}\n").unwrap();
        fs::write(temp_dir.path().join("outputs.tf"), "output \"b\" {\n  value = 1\n}\n").unwrap();

        let set = load_module(temp_dir.path()).unwrap();
        let names: Vec<&str> = set.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["outputs.tf", "variables.tf"]);
    }

    #[test]
    fn test_load_module_fails_on_syntax_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.tf"), "variable \"a\" {}\n").unwrap();
        fs::write(temp_dir.path().join("bad.tf"), "output \"b\" {\n").unwrap();

        let err = load_module(temp_dir.path()).unwrap_err();
        assert!(matches!(err, DocError::Parse { .. }));
    }

    #[test]
    fn test_load_module_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_module(temp_dir.path()).unwrap().is_empty());
    }
}
