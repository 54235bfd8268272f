use log::Level;
use thiserror::Error;

use crate::{
    listing::{ListingError, RepositoryLister},
    logger::FetchLog,
    mirror::{mirror_repositories, prepare_target_directory, CloneRunner, DirectoryError},
    model::FetchParams,
};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Target directory setup failed: {0}")]
    Directory(#[from] DirectoryError),
    #[error("Repository listing failed: {0}")]
    Listing(#[from] ListingError),
}

/// Lists the project's repositories once and clones each into the target directory.
///
/// Only directory setup and the listing call can fail the fetch. Individual clone
/// failures are reported through `log` and otherwise ignored.
pub fn fetch(
    params: &FetchParams,
    lister: &dyn RepositoryLister,
    runner: &dyn CloneRunner,
    log: &dyn FetchLog,
) -> Result<(), FetchError> {
    log.log(
        Level::Info,
        &format!(
            "Starting fetch process for Azure DevOps organization '{}' and project '{}' into directory '{}'.",
            params.organization,
            params.project,
            params.target_directory.display()
        ),
    );

    prepare_target_directory(&params.target_directory, log)?;

    log.log(
        Level::Info,
        &format!(
            "Fetching repositories for Azure DevOps project '{}'.",
            params.project
        ),
    );
    let listing = match lister.list(params) {
        Ok(listing) => listing,
        Err(error) => {
            log.log(Level::Error, &error.to_string());
            return Err(error.into());
        }
    };

    if listing.continuation.is_some() {
        log.log(
            Level::Warn,
            "The service reported more repositories than it returned; the listing may be incomplete.",
        );
    }

    if listing.repositories.is_empty() {
        log.log(
            Level::Info,
            &format!("No repositories found for project '{}'.", params.project),
        );
        return Ok(());
    }

    log.log(
        Level::Info,
        &format!(
            "Found {} repositories. Starting cloning process.",
            listing.repositories.len()
        ),
    );

    mirror_repositories(
        &params.target_directory,
        &listing.repositories,
        runner,
        log,
    );

    log.log(Level::Info, "All repositories have been processed.");
    Ok(())
}
