//! Default on-disk locations for the state record and action journal.

use std::path::PathBuf;

/// Returns `~/.config/restday[-dev]/` based on RESTDAY_ENV.
///
/// Set RESTDAY_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RESTDAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("restday-dev")
    } else {
        base_dir.join("restday")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default location of the durable state record.
pub fn state_file() -> Result<PathBuf, std::io::Error> {
    Ok(data_dir()?.join("state.json"))
}

/// Default location of the action journal.
pub fn journal_file() -> Result<PathBuf, std::io::Error> {
    Ok(data_dir()?.join("actions.log"))
}
