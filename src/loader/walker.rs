use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::Result;

/// Extensions of Terraform configuration files
const EXTENSIONS: &[&str] = &["tf"];

/// Finds the configuration files of a single module directory.
///
/// Subdirectories are separate modules and are not visited.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleWalker;

impl ModuleWalker {
    pub fn new() -> Self {
        Self
    }

    /// Sorted `.tf` files directly under `root`. A file path is returned as-is
    /// when it has a supported extension.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(if self.is_supported(root) {
                vec![root.to_path_buf()]
            } else {
                Vec::new()
            });
        }
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            )
            .into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .max_depth(Some(1))
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_file() && self.is_supported(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext))
    }
}
