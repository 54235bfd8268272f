use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    path::PathBuf,
};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const UNNAMED_REPOSITORY: &str = "Unnamed Repository";

pub const ORGANIZATION: &str = "organization";
pub const PROJECT: &str = "project";
pub const TOKEN: &str = "token";
pub const TARGET_DIRECTORY: &str = "target_directory";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamsError {
    #[error("Missing required parameter `{0}`")]
    MissingParameter(&'static str),
}

/// Everything a single fetch needs to know about where to list from and where to clone to.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub organization: String,
    pub project: String,
    pub target_directory: PathBuf,
    pub token: String,
}

impl FetchParams {
    pub fn new(
        organization: Option<String>,
        project: Option<String>,
        target_directory: Option<PathBuf>,
        token: Option<String>,
    ) -> Result<FetchParams, ParamsError> {
        Ok(FetchParams {
            organization: required(ORGANIZATION, organization)?,
            project: required(PROJECT, project)?,
            target_directory: target_directory
                .filter(|path| !path.as_os_str().is_empty())
                .ok_or(ParamsError::MissingParameter(TARGET_DIRECTORY))?,
            token: required(TOKEN, token)?,
        })
    }

    /// Builds parameters from the untyped key/value map a host framework hands over.
    pub fn from_map(params: &HashMap<String, String>) -> Result<FetchParams, ParamsError> {
        Self::new(
            params.get(ORGANIZATION).cloned(),
            params.get(PROJECT).cloned(),
            params.get(TARGET_DIRECTORY).map(PathBuf::from),
            params.get(TOKEN).cloned(),
        )
    }
}

// The token never ends up in logs.
impl std::fmt::Debug for FetchParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchParams")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("target_directory", &self.target_directory)
            .field("token", &"***")
            .finish()
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ParamsError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(ParamsError::MissingParameter(name))
}

/// One entry of the listing response: enough to attempt a clone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDescriptor {
    #[serde(default = "unnamed", deserialize_with = "name_or_unnamed")]
    pub name: String,
    #[serde(rename = "remoteUrl", default)]
    pub clone_url: Option<String>,
}

impl RepositoryDescriptor {
    pub fn new(name: impl Into<String>, clone_url: Option<String>) -> Self {
        RepositoryDescriptor {
            name: name.into(),
            clone_url,
        }
    }
}

impl Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn unnamed() -> String {
    UNNAMED_REPOSITORY.to_owned()
}

// `"name": null` is treated like a missing name.
fn name_or_unnamed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unnamed))
}
