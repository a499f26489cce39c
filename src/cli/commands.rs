use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use tfdoc::doc::header;
use tfdoc::error::{DocError, Result};
use tfdoc::loader::{load_module, HclParser};
use tfdoc::render::{render, OutputFormat, RenderOptions};
use tfdoc::Doc;

/// File whose leading `/** */` comment describes the module
const HEADER_FILE: &str = "main.tf";

#[derive(Parser)]
#[command(name = "tfdoc")]
#[command(about = "Generate documentation for Terraform modules")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Markdown tables for the module in the current directory
    tfdoc render

    # JSON for another module, sorted by name
    tfdoc render ./modules/vpc --format json --sort

    # Inspect the parsed tree of a single file
    tfdoc ast variables.tf
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render documentation for a module
    Render {
        /// Module directory (or a single .tf file)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (markdown, json or yaml)
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Sort inputs and outputs by name
        #[arg(long)]
        sort: bool,

        /// Do not use the main.tf header comment as module description
        #[arg(long)]
        no_header: bool,
    },

    /// Print the parsed tree of a file as JSON
    Ast {
        /// Path to a .tf file
        file: PathBuf,
    },
}

pub fn render_module(path: &Path, format: &str, sort: bool, no_header: bool) -> Result<()> {
    let format = OutputFormat::from_str(format)
        .ok_or_else(|| DocError::UnknownFormat(format.to_string()))?;

    let files = load_module(path)?;
    let mut doc = Doc::create(&files)?;

    if !no_header {
        if let Some(comment) = files.get(HEADER_FILE).and_then(header) {
            doc = doc.with_comment(comment);
        }
    }

    info!(
        "Rendering {} inputs and {} outputs as {}",
        doc.inputs.len(),
        doc.outputs.len(),
        format.as_str()
    );

    let rendered = render(&doc, format, RenderOptions { sort })?;
    print!("{}", rendered);

    Ok(())
}

pub fn print_ast(file: &Path) -> Result<()> {
    let tree = HclParser::new().parse_file(file)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}
