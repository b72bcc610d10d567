use crate::settings::{
    env::apply_env_overrides, error::SettingsError, file::SettingsFile,
    validated::ValidatedSettings, validator::SettingsValidator,
};
use std::path::Path;
use tracing::info;

pub mod env;
pub mod error;
pub mod file;
pub mod validated;
pub mod validator;

/// Reads the settings file at `path`, applies environment credential
/// overrides and validates the result.
pub fn load(path: &Path) -> Result<ValidatedSettings, SettingsError> {
    load_with(path, |_| {})
}

/// Like [`load`], with `adjust` applied to the parsed file before
/// validation. Command-line overrides go through here.
pub fn load_with(
    path: &Path,
    adjust: impl FnOnce(&mut SettingsFile),
) -> Result<ValidatedSettings, SettingsError> {
    info!(path = %path.display(), "Loading settings.");

    let mut file = SettingsFile::from_path(path)?;
    apply_env_overrides(&mut file.cluster);
    adjust(&mut file);
    SettingsValidator::new(file).validate()
}
