pub mod check;
pub mod encode;
pub mod members;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use memref_core::{FilterConfig, MemberFilter, ScopeFlags, TypeInfo, TypeManifest};

#[derive(Parser)]
#[command(
    name = "memref",
    about = "Inspect member reference tokens against type manifests",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tokens a picker would offer for a type
    Members {
        /// Path to the type manifest (JSON)
        manifest: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Check that persisted tokens still resolve
    Check {
        /// Path to the type manifest (JSON)
        manifest: PathBuf,
        /// Tokens to resolve
        #[arg(required = true)]
        tokens: Vec<String>,
        /// Scope flags, comma separated (e.g. public,instance)
        #[arg(long)]
        scope: Option<String>,
    },
    /// Print the tokens of every member with the given name
    Encode {
        /// Path to the type manifest (JSON)
        manifest: PathBuf,
        /// Member name
        name: String,
        /// Scope flags, comma separated (e.g. public,instance)
        #[arg(long)]
        scope: Option<String>,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    /// Filter option such as r:int or mpc:1 (repeatable)
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,
    /// Leave out data members
    #[arg(long)]
    pub no_fields: bool,
    /// Leave out accessors
    #[arg(long)]
    pub no_properties: bool,
    /// Leave out callables
    #[arg(long)]
    pub no_methods: bool,
    /// Scope flags, comma separated (e.g. public,instance)
    #[arg(long)]
    pub scope: Option<String>,
    /// Filter config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl FilterArgs {
    /// Config file, then environment, then flags.
    pub fn resolve(&self) -> Result<MemberFilter> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open config {}", path.display()))?;
                serde_json::from_reader::<_, FilterConfig>(file)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => FilterConfig::default(),
        }
        .with_env();

        if !self.options.is_empty() {
            config.options.clone_from(&self.options);
        }
        if let Some(scope) = &self.scope {
            config.scope = scope.split(',').map(str::to_string).collect();
        }
        config.fields &= !self.no_fields;
        config.properties &= !self.no_properties;
        config.methods &= !self.no_methods;

        Ok(config.to_filter()?)
    }
}

pub fn load_manifest(path: &Path) -> Result<TypeInfo> {
    let file = File::open(path)
        .with_context(|| format!("failed to open manifest {}", path.display()))?;
    let manifest = TypeManifest::from_reader(file)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    Ok(manifest.into_type_info()?)
}

pub fn parse_scope(scope: Option<&str>) -> Result<ScopeFlags> {
    match scope {
        Some(scope) => Ok(ScopeFlags::parse_list(scope.split(','))?),
        None => Ok(FilterConfig::from_env().scope_flags()?),
    }
}
