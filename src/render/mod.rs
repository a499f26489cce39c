//! Rendering of [`Doc`] values
//!
//! Markdown tables for READMEs, plus JSON and YAML for other tooling.

use std::borrow::Cow;
use std::fmt::Write;

use crate::doc::{Doc, Input, Output};
use crate::error::Result;

/// Output format for rendered documentation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Order inputs and outputs by name
    pub sort: bool,
}

/// Render `doc` in `format`. The doc itself is left untouched.
pub fn render(doc: &Doc, format: OutputFormat, options: RenderOptions) -> Result<String> {
    let doc = if options.sort {
        Cow::Owned(sorted(doc))
    } else {
        Cow::Borrowed(doc)
    };

    match format {
        OutputFormat::Markdown => Ok(markdown(&doc)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&*doc)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&*doc)?),
    }
}

fn sorted(doc: &Doc) -> Doc {
    let mut inputs: Vec<Input> = doc.inputs.clone();
    let mut outputs: Vec<Output> = doc.outputs.clone();
    inputs.sort_by(|a, b| a.name.cmp(&b.name));
    outputs.sort_by(|a, b| a.name.cmp(&b.name));

    Doc {
        comment: doc.comment.clone(),
        inputs,
        outputs,
    }
}

/// Markdown tables, one section per non-empty list.
pub fn markdown(doc: &Doc) -> String {
    let mut out = String::new();

    if !doc.comment.trim().is_empty() {
        out.push_str(doc.comment.trim());
        out.push_str("\n\n");
    }

    if !doc.inputs.is_empty() {
        out.push_str("## Inputs\n\n");
        out.push_str("| Name | Description | Default | Required |\n");
        out.push_str("|------|-------------|:-----:|:-----:|\n");
        for input in &doc.inputs {
            let default = if input.default.is_empty() {
                "-".to_string()
            } else {
                format!("`{}`", cell(&input.default))
            };
            let required = if input.is_required() { "yes" } else { "no" };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                cell(&input.name),
                cell(&input.description),
                default,
                required
            );
        }
        out.push('\n');
    }

    if !doc.outputs.is_empty() {
        out.push_str("## Outputs\n\n");
        out.push_str("| Name | Description |\n");
        out.push_str("|------|-------------|\n");
        for output in &doc.outputs {
            let _ = writeln!(
                out,
                "| {} | {} |",
                cell(&output.name),
                cell(&output.description)
            );
        }
        out.push('\n');
    }

    out
}

/// Fold lines and escape pipes so text fits in a table cell.
fn cell(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
