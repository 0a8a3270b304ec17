//! Optional config file loading. Search order: ./novelgrab.toml, then
//! $XDG_CONFIG_HOME/novelgrab/config.toml (or ~/.config/novelgrab/config.toml).

use serde::Deserialize;
use std::path::PathBuf;

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Root output directory when --output is not set. Relative to CWD.
    pub output_dir: Option<PathBuf>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Delay in seconds between requests.
    pub request_delay_secs: Option<u64>,
    /// Request timeout in seconds. Absent means no timeout.
    pub timeout_secs: Option<u64>,
    /// Default chapter-download cap when neither --limit nor --all is given.
    pub chapter_limit: Option<usize>,
}

/// Search order: (1) ./novelgrab.toml, (2) $XDG_CONFIG_HOME/novelgrab/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("novelgrab.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("novelgrab").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&s)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            return Ok(Some(config));
        }
    }
    Ok(None)
}
