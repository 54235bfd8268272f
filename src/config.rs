use std::{collections::HashMap, path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File, FileFormat};
use home::home_dir;
use serde::Deserialize;

use crate::listing::TokenEncoding;

const ENV_PREFIX: &str = "ADO_MIRROR";

/// Settings collected from the config file and the environment.
///
/// Every field is optional here; required parameters are checked when the
/// mirror is built.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MirrorConfig {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub token: Option<String>,
    pub host: Option<String>,
    pub token_encoding: Option<TokenEncoding>,
    pub target_directory: Option<PathBuf>,
    pub git_executable: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl MirrorConfig {
    /// Loads `file` (or the default `~/.ado-mirror/config.toml`) overlaid with `ADO_MIRROR_*` variables.
    pub fn load(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let file = file.or_else(default_config_file);
        let raw_config = RawConfig::load(file, None)?;

        Ok(Self {
            organization: raw_config.azure.organization,
            project: raw_config.azure.project,
            token: raw_config.azure.token,
            host: raw_config.azure.host,
            token_encoding: raw_config.azure.encoding,
            target_directory: raw_config.target.dir,
            git_executable: raw_config.git.executable,
            timeout: raw_config.http.timeout.map(Duration::from_secs),
        })
    }
}

fn default_config_file() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".ado-mirror").join("config.toml"))
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    azure: AzureConfig,
    #[serde(default)]
    target: TargetConfig,
    #[serde(default)]
    git: GitConfig,
    #[serde(default)]
    http: HttpConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct AzureConfig {
    organization: Option<String>,
    project: Option<String>,
    token: Option<String>,
    host: Option<String>,
    encoding: Option<TokenEncoding>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct TargetConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct GitConfig {
    executable: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct HttpConfig {
    /// Seconds
    timeout: Option<u64>,
}

impl RawConfig {
    fn load(
        file: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
