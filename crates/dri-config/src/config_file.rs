use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".dri-bot.toml";
const APP_NAME: &str = "dri-bot";

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "DRI_BOT_CONFIG";

/// Load config file content
///
/// Searches in order:
/// 1. `$DRI_BOT_CONFIG` if set
/// 2. `.dri-bot.toml` in the current working directory
/// 3. `dri-bot/config.toml` in the user config directory
/// 4. `~/.dri-bot.toml`
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    candidate_paths()
        .into_iter()
        .find_map(|path| match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Some(content)
            }
            Err(_) => None,
        })
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(explicit) = env::var_os(CONFIG_PATH_ENV) {
        paths.push(PathBuf::from(explicit));
    }

    paths.push(PathBuf::from(CONFIG_FILE));

    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_NAME).join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_FILE));
    }

    paths
}
