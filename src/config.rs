/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Every gameplay number lives here; the simulation takes these values by
/// reference and has no other configuration surface.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub rules: RulesConfig,
    pub speed: SpeedConfig,
}

#[derive(Clone, Debug)]
pub struct BoardConfig {
    pub columns: i32,
    pub rows: i32,
    pub wall_min: usize,
    pub wall_max: usize,
    pub food_min: usize,
    pub food_max: usize,
    /// Fixed RNG seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub starting_food: i32,
    pub move_cost: i32,
    pub points_per_food: i32,
    pub points_per_soda: i32,
    pub wall_damage: i32,
    pub wall_integrity: i32,
    pub enemy_damage: i32,
    pub enemy_damage_heavy: i32,
    pub restart_delay_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    /// Ticks an interpolated one-cell move takes to complete.
    pub move_duration_ticks: u32,
    /// Ticks the "Day N" banner stays up between levels.
    pub day_banner_ticks: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    speed: TomlSpeed,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_columns")]
    columns: i32,
    #[serde(default = "default_rows")]
    rows: i32,
    #[serde(default = "default_wall_min")]
    wall_min: usize,
    #[serde(default = "default_wall_max")]
    wall_max: usize,
    #[serde(default = "default_food_min")]
    food_min: usize,
    #[serde(default = "default_food_max")]
    food_max: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_starting_food")]
    starting_food: i32,
    #[serde(default = "default_move_cost")]
    move_cost: i32,
    #[serde(default = "default_points_per_food")]
    points_per_food: i32,
    #[serde(default = "default_points_per_soda")]
    points_per_soda: i32,
    #[serde(default = "default_wall_damage")]
    wall_damage: i32,
    #[serde(default = "default_wall_integrity")]
    wall_integrity: i32,
    #[serde(default = "default_enemy_damage")]
    enemy_damage: i32,
    #[serde(default = "default_enemy_damage_heavy")]
    enemy_damage_heavy: i32,
    #[serde(default = "default_restart_delay")]
    restart_delay_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_move_duration")]
    move_duration_ticks: u32,
    #[serde(default = "default_day_banner")]
    day_banner_ticks: u32,
}

// ── Defaults ──

fn default_columns() -> i32 { 8 }
fn default_rows() -> i32 { 8 }
fn default_wall_min() -> usize { 5 }
fn default_wall_max() -> usize { 9 }
fn default_food_min() -> usize { 1 }
fn default_food_max() -> usize { 5 }

fn default_starting_food() -> i32 { 100 }
fn default_move_cost() -> i32 { 1 }
fn default_points_per_food() -> i32 { 10 }
fn default_points_per_soda() -> i32 { 20 }
fn default_wall_damage() -> i32 { 1 }
fn default_wall_integrity() -> i32 { 3 }
fn default_enemy_damage() -> i32 { 10 }
fn default_enemy_damage_heavy() -> i32 { 20 }
fn default_restart_delay() -> u32 { 15 }

fn default_tick_rate() -> u64 { 60 }
fn default_move_duration() -> u32 { 4 }
fn default_day_banner() -> u32 { 25 }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            columns: default_columns(),
            rows: default_rows(),
            wall_min: default_wall_min(),
            wall_max: default_wall_max(),
            food_min: default_food_min(),
            food_max: default_food_max(),
            seed: None,
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            starting_food: default_starting_food(),
            move_cost: default_move_cost(),
            points_per_food: default_points_per_food(),
            points_per_soda: default_points_per_soda(),
            wall_damage: default_wall_damage(),
            wall_integrity: default_wall_integrity(),
            enemy_damage: default_enemy_damage(),
            enemy_damage_heavy: default_enemy_damage_heavy(),
            restart_delay_ticks: default_restart_delay(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            move_duration_ticks: default_move_duration(),
            day_banner_ticks: default_day_banner(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            board: BoardConfig {
                columns: toml_cfg.board.columns.max(3),
                rows: toml_cfg.board.rows.max(3),
                wall_min: toml_cfg.board.wall_min,
                wall_max: toml_cfg.board.wall_max.max(toml_cfg.board.wall_min),
                food_min: toml_cfg.board.food_min,
                food_max: toml_cfg.board.food_max.max(toml_cfg.board.food_min),
                seed: toml_cfg.board.seed,
            },
            rules: RulesConfig {
                starting_food: toml_cfg.rules.starting_food,
                move_cost: toml_cfg.rules.move_cost,
                points_per_food: toml_cfg.rules.points_per_food,
                points_per_soda: toml_cfg.rules.points_per_soda,
                wall_damage: toml_cfg.rules.wall_damage,
                wall_integrity: toml_cfg.rules.wall_integrity,
                enemy_damage: toml_cfg.rules.enemy_damage,
                enemy_damage_heavy: toml_cfg.rules.enemy_damage_heavy,
                restart_delay_ticks: toml_cfg.rules.restart_delay_ticks,
            },
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms,
                move_duration_ticks: toml_cfg.speed.move_duration_ticks,
                day_banner_ticks: toml_cfg.speed.day_banner_ticks,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // Resolve symlinks so a symlinked binary still finds its data.
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

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.board.columns, 8);
        assert_eq!(cfg.rules.points_per_soda, 20);
        assert_eq!(cfg.speed.move_duration_ticks, 4);
        assert!(cfg.board.seed.is_none());
    }

    #[test]
    fn partial_section_keeps_remaining_defaults() {
        let cfg: TomlConfig = toml::from_str("[board]\ncolumns = 12\nseed = 99\n").unwrap();
        assert_eq!(cfg.board.columns, 12);
        assert_eq!(cfg.board.rows, 8);
        assert_eq!(cfg.board.seed, Some(99));
    }
}
