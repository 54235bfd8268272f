use std::path::Path;

use crate::{
    connection::{self, ConnectionData},
    fetch::{self, FetchError},
    listing::RepositoryLister,
    logger::FetchLog,
    mirror::CloneRunner,
    model::FetchParams,
};

mod builder;

pub use builder::{AdoMirrorBuilder, BuildError};

/// What a host framework expects from a pluggable data source.
pub trait DataSource {
    /// Runs one complete fetch.
    fn fetch(&self) -> Result<(), FetchError>;

    /// SVG markup identifying the source.
    fn icon(&self) -> String;

    /// Connection type and the fields a user has to provide.
    fn connection_data(&self) -> ConnectionData;
}

pub struct AdoMirror {
    params: FetchParams,
    lister: Box<dyn RepositoryLister>,
    runner: Box<dyn CloneRunner>,
    logger: Box<dyn FetchLog>,
}

impl AdoMirror {
    pub fn builder() -> AdoMirrorBuilder {
        AdoMirrorBuilder::default()
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }

    pub fn target_directory(&self) -> &Path {
        &self.params.target_directory
    }
}

impl DataSource for AdoMirror {
    fn fetch(&self) -> Result<(), FetchError> {
        fetch::fetch(
            &self.params,
            self.lister.as_ref(),
            self.runner.as_ref(),
            self.logger.as_ref(),
        )
    }

    fn icon(&self) -> String {
        connection::icon()
    }

    fn connection_data(&self) -> ConnectionData {
        connection::connection_data()
    }
}
