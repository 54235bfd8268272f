use std::{error::Error, time::Duration};

use log::debug;

use crate::{
    cli::args::FetchArgs,
    config::MirrorConfig,
    connection::{connection_data, icon},
    AdoMirror, AdoMirrorBuilder, DataSource,
};

/// Handler to fetch command
pub fn do_fetch(args: FetchArgs, config: MirrorConfig) -> Result<(), Box<dyn Error>> {
    let mirror = mirror_builder(args, config).try_build()?;
    debug!("Fetching with {:?}", mirror.params());
    mirror.fetch()?;
    Ok(())
}

/// Handler to connection command
pub fn do_connection() -> Result<(), Box<dyn Error>> {
    print!("{}", toml::to_string_pretty(&connection_data())?);
    Ok(())
}

/// Handler to icon command
pub fn do_icon() -> Result<(), Box<dyn Error>> {
    println!("{}", icon());
    Ok(())
}

/// Command line values win over the configuration file and environment.
fn mirror_builder(args: FetchArgs, config: MirrorConfig) -> AdoMirrorBuilder {
    let FetchArgs {
        organization,
        project,
        token,
        target_directory,
        host,
        token_encoding,
        git,
        timeout,
    } = args;

    let mut builder = AdoMirror::builder();
    if let Some(organization) = organization.or(config.organization) {
        builder = builder.organization(organization);
    }
    if let Some(project) = project.or(config.project) {
        builder = builder.project(project);
    }
    if let Some(token) = token.or(config.token) {
        builder = builder.token(token);
    }
    if let Some(target_directory) = target_directory.or(config.target_directory) {
        builder = builder.target_directory(target_directory);
    }
    if let Some(host) = host.or(config.host) {
        builder = builder.host(host);
    }
    if let Some(encoding) = token_encoding.or(config.token_encoding) {
        builder = builder.token_encoding(encoding);
    }
    if let Some(git) = git.or(config.git_executable) {
        builder = builder.git_executable(git);
    }
    if let Some(timeout) = timeout.map(Duration::from_secs).or(config.timeout) {
        builder = builder.timeout(timeout);
    }
    builder
}
