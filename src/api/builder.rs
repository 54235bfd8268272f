use std::{collections::HashMap, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::{
    listing::{
        AzureDevOpsLister, ListingError, RepositoryLister, TokenEncoding, DEFAULT_HOST,
        DEFAULT_TIMEOUT,
    },
    logger::{FetchLog, LogCrate},
    mirror::{CloneRunner, GitCli, DEFAULT_GIT_EXECUTABLE},
    model::{FetchParams, ParamsError, ORGANIZATION, PROJECT, TARGET_DIRECTORY, TOKEN},
    AdoMirror,
};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error("Could not set up the repository listing client: {0}")]
    Listing(#[from] ListingError),
}

#[derive(Default)]
pub struct AdoMirrorBuilder {
    organization: Option<String>,
    project: Option<String>,
    token: Option<String>,
    target_directory: Option<PathBuf>,

    host: Option<String>,
    token_encoding: Option<TokenEncoding>,
    git_executable: Option<PathBuf>,
    timeout: Option<Duration>,

    lister: Option<Box<dyn RepositoryLister>>,
    runner: Option<Box<dyn CloneRunner>>,
    logger: Option<Box<dyn FetchLog>>,
}

impl AdoMirrorBuilder {
    /// Azure DevOps organization that owns the project.
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Project whose repositories are mirrored.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Credential placed in the `Authorization: Basic` header, see [`Self::token_encoding`].
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Directory under which every repository is cloned.
    ///
    /// Created, with its parents, when missing.
    pub fn target_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_directory = Some(path.into());
        self
    }

    /// Takes the four connection fields from a host-supplied map.
    /// Keys that are absent leave the current value untouched.
    pub fn params(mut self, params: &HashMap<String, String>) -> Self {
        if let Some(value) = params.get(ORGANIZATION) {
            self.organization = Some(value.clone());
        }
        if let Some(value) = params.get(PROJECT) {
            self.project = Some(value.clone());
        }
        if let Some(value) = params.get(TOKEN) {
            self.token = Some(value.clone());
        }
        if let Some(value) = params.get(TARGET_DIRECTORY) {
            self.target_directory = Some(PathBuf::from(value));
        }
        self
    }

    /// Service root.
    ///
    /// Defaults to `https://dev.azure.com`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Defaults to [`TokenEncoding::Raw`].
    pub fn token_encoding(mut self, encoding: TokenEncoding) -> Self {
        self.token_encoding = Some(encoding);
        self
    }

    /// Defaults to `git` from `PATH`.
    pub fn git_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.git_executable = Some(path.into());
        self
    }

    /// Timeout of the listing request.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Where progress messages go. Defaults to the `log` facade.
    pub fn logger(mut self, logger: impl FetchLog + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    /// Replaces the HTTP listing client.
    pub fn lister(mut self, lister: impl RepositoryLister + 'static) -> Self {
        self.lister = Some(Box::new(lister));
        self
    }

    /// Replaces the `git` command line runner.
    pub fn clone_runner(mut self, runner: impl CloneRunner + 'static) -> Self {
        self.runner = Some(Box::new(runner));
        self
    }

    pub fn try_build(self) -> Result<AdoMirror, BuildError> {
        let Self {
            organization,
            project,
            token,
            target_directory,
            host,
            token_encoding,
            git_executable,
            timeout,
            lister,
            runner,
            logger,
        } = self;

        let params = FetchParams::new(organization, project, target_directory, token)?;

        let lister: Box<dyn RepositoryLister> = match lister {
            Some(lister) => lister,
            None => Box::new(AzureDevOpsLister::new(
                host.as_deref().unwrap_or(DEFAULT_HOST),
                token_encoding.unwrap_or_default(),
                timeout.unwrap_or(DEFAULT_TIMEOUT),
            )?),
        };

        let runner: Box<dyn CloneRunner> = runner.unwrap_or_else(|| {
            Box::new(GitCli::new(
                git_executable.unwrap_or_else(|| PathBuf::from(DEFAULT_GIT_EXECUTABLE)),
            ))
        });

        let logger: Box<dyn FetchLog> = logger.unwrap_or_else(|| Box::new(LogCrate));

        Ok(AdoMirror {
            params,
            lister,
            runner,
            logger,
        })
    }
}
