//! Environment loading for the CLI

use std::path::PathBuf;

use tracing::debug;

/// Load `.env` files into the process environment.
///
/// Priority: existing variables, then `./.env`, then `~/.evently/.env`.
/// dotenvy never overwrites a variable that is already set.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found, using environment variables only");
    }
}

/// `~/.evently`
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".evently"))
}
