use std::path::{Path, PathBuf};

use log::trace;
use serde::Serialize;

use crate::model::{ORGANIZATION, PROJECT, TARGET_DIRECTORY, TOKEN};

pub const CONNECTION_TYPE: &str = "AzureDevOps";
pub const ICON_FILE_NAME: &str = "icon.svg";

pub const DEFAULT_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="24" height="24" rx="4" fill="#0078D7"/><path fill="#fff" d="M6 12l6-6 6 6-6 6z"/></svg>"##;

/// Describes what a host needs to collect before it can configure a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionData {
    pub connection_type: &'static str,
    pub fields: Vec<&'static str>,
}

pub fn connection_data() -> ConnectionData {
    ConnectionData {
        connection_type: CONNECTION_TYPE,
        fields: vec![ORGANIZATION, PROJECT, TOKEN, TARGET_DIRECTORY],
    }
}

/// `icon.svg` next to the running executable, if the executable can be located.
pub fn icon_path() -> Option<PathBuf> {
    let executable = std::env::current_exe().ok()?;
    Some(executable.parent()?.join(ICON_FILE_NAME))
}

/// The installed icon, or [`DEFAULT_ICON`] when there is none.
pub fn icon() -> String {
    match icon_path() {
        Some(path) => icon_from(&path),
        None => DEFAULT_ICON.to_owned(),
    }
}

pub fn icon_from(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            trace!("Using the default icon, {} unreadable: {}", path.display(), error);
            DEFAULT_ICON.to_owned()
        }
    }
}
