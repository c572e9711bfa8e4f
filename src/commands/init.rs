use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its data subdirectory and an initial `config.json` file with
/// default settings.
///
/// # Arguments
/// - `home` - The directory that will be the root of the home directory, e.g. `$HOME/spendbook`
///
/// # Errors
/// - Returns an error if the home directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the spendbook directory at {}",
        config.root().display()
    )
    .into())
}
