//! Module documentation model
//!
//! Builds a [`Doc`] listing every input variable and output of a Terraform
//! module from its parsed files.

pub mod extract;
pub mod normalize;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::File;
use crate::error::{DocError, Result};

pub use extract::DeclKind;
pub use normalize::{comment, header, unquote, unquote_or_empty, UnquoteError};

/// A module input variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub name: String,
    /// Unquoted description, empty when absent
    pub description: String,
    /// Raw source text of the default literal, empty when absent
    pub default: String,
}

impl Input {
    /// An input without a default must be supplied by the caller.
    pub fn is_required(&self) -> bool {
        self.default.is_empty()
    }
}

/// A module output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    /// Collapsed leading comment, empty when absent
    pub description: String,
}

/// Extracted documentation for a set of files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doc {
    pub comment: String,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Doc {
    /// Build a doc from `(file name, parsed file)` pairs.
    ///
    /// Inputs and outputs are concatenated in iteration order. Fails if any
    /// file root is not an object list or a declaration is malformed.
    pub fn create<'a, I, K>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, &'a File)>,
        K: AsRef<str>,
    {
        let mut doc = Doc::default();

        for (name, file) in files {
            let name = name.as_ref();
            let list = file
                .object_list()
                .ok_or_else(|| DocError::NotObjectList(name.to_string()))?;

            let inputs = extract::inputs(name, list)?;
            let outputs = extract::outputs(name, list)?;
            debug!(
                "{}: {} inputs, {} outputs",
                name,
                inputs.len(),
                outputs.len()
            );

            doc.inputs.extend(inputs);
            doc.outputs.extend(outputs);
        }

        Ok(doc)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}
