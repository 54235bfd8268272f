use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::listing::TokenEncoding;

/// Mirrors the Git repositories of an Azure DevOps project to local disk.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Configuration file.
    /// Defaults to `$HOME/.ado-mirror/config.toml`
    #[clap(short, long, env = "ADO_MIRROR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    ///Lists the project's repositories and clones each one into the target directory
    Fetch(FetchArgs),
    ///Prints the connection type and the fields it requires
    Connection,
    ///Prints the SVG icon of this data source
    Icon,
}

#[derive(Debug, Default, Args)]
pub struct FetchArgs {
    /// Azure DevOps organization
    #[clap(short, long)]
    pub organization: Option<String>,
    /// Project within the organization
    #[clap(short, long)]
    pub project: Option<String>,
    /// Credential sent as `Authorization: Basic <token>`
    #[clap(long, env = "AZURE_DEVOPS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// Directory the repositories are cloned into
    #[clap(short = 'd', long)]
    pub target_directory: Option<PathBuf>,
    /// Service root, e.g. https://dev.azure.com
    #[clap(long)]
    pub host: Option<String>,
    /// `raw` sends the token as given, `pat` encodes it as a personal access token
    #[clap(long)]
    pub token_encoding: Option<TokenEncoding>,
    /// git executable used for cloning
    #[clap(long)]
    pub git: Option<PathBuf>,
    /// Listing request timeout in seconds
    #[clap(long)]
    pub timeout: Option<u64>,
}
