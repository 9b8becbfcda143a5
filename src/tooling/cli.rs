//! CLI Tooling
//!
//! `exlookup` mounts a host directory as a volume and resolves paths in it
//! with exFAT name collation.

use crate::config::{ConfigLoader, LookupConfig};
use crate::encoding::ComponentEncoder;
use crate::error::{ApiError, LookupError};
use crate::iter::DirIterator;
use crate::lookup::Volume;
use crate::tree::host::HostDirLoader;
use crate::tree::NodeRef;
use crate::types::NodeKind;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use std::path::PathBuf;
use tracing::info;

/// exlookup - exFAT path resolution over a host directory
#[derive(Parser)]
#[command(name = "exlookup")]
#[command(about = "Resolve paths with exFAT name collation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Host directory presented as the volume root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Raw little-endian up-case table (overrides config)
    #[arg(long)]
    pub upcase: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a path and print the node it names
    Resolve { path: String },
    /// List a directory in on-disk order
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Compare two names under the up-case table
    Compare { a: String, b: String },
}

/// CLI execution context
pub struct CliContext {
    volume: Volume,
    config: LookupConfig,
}

impl CliContext {
    /// Load configuration and mount `root`.
    pub fn new(
        root: PathBuf,
        config_path: Option<PathBuf>,
        upcase: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let mut config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if upcase.is_some() {
            config.upcase_table = upcase;
        }
        Self::with_config(root, config)
    }

    pub fn with_config(root: PathBuf, config: LookupConfig) -> Result<Self, ApiError> {
        let loader = HostDirLoader::new(&root).map_err(|e| {
            ApiError::ConfigError(format!("Cannot open root {}: {}", root.display(), e))
        })?;
        info!(root = %loader.root_path().display(), "Mounted host directory");
        let volume = Volume::with_encoder(loader, config.collator()?, config.encoder());
        Ok(CliContext { volume, config })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Run one command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Resolve { path } => {
                let node = self.volume.lookup(path)?;
                Ok(describe(&node))
            }
            Commands::Ls { path } => {
                let dir = self.volume.lookup(path)?;
                let it = DirIterator::open(&dir)?;
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["Name", "Kind", "Size"]);
                for child in it {
                    table.add_row(vec![
                        child.name().to_string(),
                        kind_label(child.kind()).to_string(),
                        child.size().to_string(),
                    ]);
                }
                Ok(table.to_string())
            }
            Commands::Compare { a, b } => {
                let encoder = self.config.encoder();
                let a_name = encoder.encode(a.as_bytes()).map_err(LookupError::from)?;
                let b_name = encoder.encode(b.as_bytes()).map_err(LookupError::from)?;
                let rc = self
                    .volume
                    .collator()
                    .compare_name(a_name.as_units(), b_name.as_units());
                let relation = match rc {
                    0 => "==",
                    rc if rc < 0 => "<",
                    _ => ">",
                };
                Ok(format!("{} {} {} ({})", a, relation, b, rc))
            }
        }
    }
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::File => "file",
        NodeKind::Directory => "dir",
    }
}

fn describe(node: &NodeRef<'_>) -> String {
    let name = node.name();
    let shown = if name.is_empty() {
        "/".to_string()
    } else {
        name.to_string()
    };
    format!(
        "{}\t{}\t{} bytes\tnode {}",
        shown,
        kind_label(node.kind()),
        node.size(),
        node.id()
    )
}
