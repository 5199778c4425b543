use std::net::SocketAddr;
use std::path::PathBuf;

use bp_types::DeploymentNamespace;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bp",
    about = "Blueprint runtime: materialize object graphs against a registry",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to $BP_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Materialize a blueprint file and print the resulting object ids
    Plan(PlanArgs),
    /// Resolve an object of a deployed app
    Lookup(LookupArgs),
    /// Run the registry HTTP service
    Serve(ServeArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Blueprint file (TOML)
    pub file: PathBuf,
    /// Deploy under this name instead of running a throwaway app
    #[arg(long)]
    pub name: Option<String>,
    /// Registry URL; an in-process registry is used when unset
    #[arg(long)]
    pub registry: Option<String>,
    #[arg(long)]
    pub namespace: Option<DeploymentNamespace>,
}

#[derive(Args)]
pub struct LookupArgs {
    pub app: String,
    /// Object tag; may be omitted for single-object apps
    pub tag: Option<String>,
    #[arg(long)]
    pub registry: Option<String>,
    #[arg(long)]
    pub namespace: Option<DeploymentNamespace>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
