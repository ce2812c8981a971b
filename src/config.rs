/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete,
/// and replaces out-of-range values with their defaults.

use log::warn;
use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::level::DEFAULT_OBSTACLE_PROBABILITY;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    /// Fixed RNG seed. `None` = seed from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub obstacle_probability: f64,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default = "default_obstacle_probability")]
    obstacle_probability: f64,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_rows() -> usize { 21 }
fn default_cols() -> usize { 21 }
fn default_obstacle_probability() -> f64 { DEFAULT_OBSTACLE_PROBABILITY }
fn default_tick_rate() -> u64 { 100 }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            rows: default_rows(),
            cols: default_cols(),
            obstacle_probability: default_obstacle_probability(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { quit: default_quit() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/worldexplorer`.
    pub fn load() -> Self {
        load_from(&candidate_dirs())
    }

    /// Parse config text directly.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let rows = if cfg.grid.rows == 0 {
            warn!("grid.rows must be at least 1; using {}", default_rows());
            default_rows()
        } else {
            cfg.grid.rows
        };
        let cols = if cfg.grid.cols == 0 {
            warn!("grid.cols must be at least 1; using {}", default_cols());
            default_cols()
        } else {
            cfg.grid.cols
        };
        // 1.0 would leave no cell for the goal.
        let p = cfg.grid.obstacle_probability;
        let obstacle_probability = if (0.0..1.0).contains(&p) {
            p
        } else {
            warn!(
                "grid.obstacle_probability {p} outside [0, 1); using {}",
                default_obstacle_probability(),
            );
            default_obstacle_probability()
        };
        let tick_rate_ms = if cfg.speed.tick_rate_ms == 0 {
            warn!("speed.tick_rate_ms must be positive; using {}", default_tick_rate());
            default_tick_rate()
        } else {
            cfg.speed.tick_rate_ms
        };

        GameConfig {
            grid: GridConfig { rows, cols, obstacle_probability },
            speed: SpeedConfig { tick_rate_ms },
            gamepad: GamepadConfig { quit: cfg.gamepad.quit },
            seed: cfg.general.seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/worldexplorer");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_from(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match GameConfig::parse(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!("config.toml parse error: {e}");
                        warn!("Using default settings.");
                        return GameConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    GameConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.grid, GridConfig { rows: 21, cols: 21, obstacle_probability: 0.2 });
        assert_eq!(cfg.speed.tick_rate_ms, 100);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse("[grid]\nrows = 11\n\n[general]\nseed = 77\n").unwrap();
        assert_eq!(cfg.grid.rows, 11);
        assert_eq!(cfg.grid.cols, 21);
        assert_eq!(cfg.seed, Some(77));
    }

    #[test]
    fn full_density_is_rejected() {
        let cfg = GameConfig::parse("[grid]\nobstacle_probability = 1.0\n").unwrap();
        assert_eq!(cfg.grid.obstacle_probability, 0.2);
        let cfg = GameConfig::parse("[grid]\nobstacle_probability = -0.5\n").unwrap();
        assert_eq!(cfg.grid.obstacle_probability, 0.2);
        let cfg = GameConfig::parse("[grid]\nobstacle_probability = 0.0\n").unwrap();
        assert_eq!(cfg.grid.obstacle_probability, 0.0);
    }

    #[test]
    fn zero_sizes_fall_back() {
        let cfg = GameConfig::parse("[grid]\nrows = 0\ncols = 0\n[speed]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!((cfg.grid.rows, cfg.grid.cols), (21, 21));
        assert_eq!(cfg.speed.tick_rate_ms, 100);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::parse("[grid\nrows = ").is_err());
    }

    #[test]
    fn default_matches_empty_file() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.grid, GameConfig::parse("").unwrap().grid);
    }

    #[test]
    fn load_from_reads_first_config_found() {
        let dir = std::env::temp_dir().join(format!("worldexplorer-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[grid]\ncols = 9\n").unwrap();

        let missing = dir.join("does-not-exist");
        let cfg = load_from(&[missing, dir.clone()]);
        assert_eq!(cfg.grid.cols, 9);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_from_nowhere_gives_defaults() {
        let cfg = load_from(&[]);
        assert_eq!(cfg.grid, GameConfig::default().grid);
    }
}
