//! `.env` loading
//!
//! Lookup order:
//! 1. `./.env` in the current directory
//! 2. `~/.newsdesk/.env`
//!
//! dotenvy never overwrites variables that are already set, so the process
//! environment wins over both files and the current directory wins over home.

use std::path::PathBuf;

/// Config directory (~/.newsdesk)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".newsdesk"))
}

/// Load `.env` files and return the paths that were read.
///
/// Runs before tracing is initialized, so the caller logs the result.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_under_home() {
        if let (Some(home), Some(dir)) = (dirs::home_dir(), config_dir()) {
            assert_eq!(dir, home.join(".newsdesk"));
        }
    }
}
