//! Session configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::spawn::{LfsrSpawner, RandomSpawner, ScriptError, ScriptedSpawner, Spawner};

/// Which spawn policy places new tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnPolicy {
    #[default]
    Random,
    Lfsr,
    Scripted,
}

impl FromStr for SpawnPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(SpawnPolicy::Random),
            "lfsr" => Ok(SpawnPolicy::Lfsr),
            "scripted" | "manual" => Ok(SpawnPolicy::Scripted),
            _ => Err(ConfigError::Policy(s.to_string())),
        }
    }
}

impl fmt::Display for SpawnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpawnPolicy::Random => "random",
            SpawnPolicy::Lfsr => "lfsr",
            SpawnPolicy::Scripted => "scripted",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown spawn policy {0:?} (expected random, lfsr or scripted)")]
    Policy(String),
    #[error("scripted spawning needs a placement script")]
    MissingScript,
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Knobs for a session. Defaults match the classic emulator loop.
///
/// - `spawn`: spawn policy.
/// - `seed`: RNG seed for `Random`; `None` draws from OS entropy.
/// - `lfsr_seed`: initial register for `Lfsr`.
/// - `script`: placement letters for `Scripted`.
/// - `start_tiles`: tiles placed before the first move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub spawn: SpawnPolicy,
    pub seed: Option<u64>,
    pub lfsr_seed: u16,
    pub script: Option<String>,
    pub start_tiles: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnPolicy::Random,
            seed: None,
            lfsr_seed: LfsrSpawner::DEFAULT_SEED,
            script: None,
            start_tiles: 1,
        }
    }
}

impl GameConfig {
    /// Build the configured spawner.
    pub fn spawner(&self) -> Result<Box<dyn Spawner>, ConfigError> {
        Ok(match self.spawn {
            SpawnPolicy::Random => match self.seed {
                Some(seed) => Box::new(RandomSpawner::seeded(seed)),
                None => Box::new(RandomSpawner::from_entropy()),
            },
            SpawnPolicy::Lfsr => Box::new(LfsrSpawner::new(self.lfsr_seed)),
            SpawnPolicy::Scripted => {
                let script = self.script.as_deref().ok_or(ConfigError::MissingScript)?;
                Box::new(script.parse::<ScriptedSpawner>()?)
            }
        })
    }

    /// A fresh game with its opening tiles, plus the spawner to keep playing with.
    pub fn new_game(&self) -> Result<(Game, Box<dyn Spawner>), ConfigError> {
        let mut spawner = self.spawner()?;
        let mut game = Game::new();
        game.start(&mut spawner, self.start_tiles);
        Ok((game, spawner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_policies() {
        assert_eq!("LFSR".parse::<SpawnPolicy>(), Ok(SpawnPolicy::Lfsr));
        assert_eq!("manual".parse::<SpawnPolicy>(), Ok(SpawnPolicy::Scripted));
        assert_eq!("time".parse::<SpawnPolicy>(), Err(ConfigError::Policy("time".into())));
        assert_eq!(SpawnPolicy::default().to_string(), "random");
    }

    #[test]
    fn it_builds_default_game() {
        let cfg = GameConfig { seed: Some(3), ..GameConfig::default() };
        let (game, _) = cfg.new_game().unwrap();
        assert_eq!(game.board().count_empty(), 15);
    }

    #[test]
    fn it_requires_script_for_scripted() {
        let cfg = GameConfig { spawn: SpawnPolicy::Scripted, ..GameConfig::default() };
        assert!(matches!(cfg.spawner(), Err(ConfigError::MissingScript)));
        let cfg = GameConfig { spawn: SpawnPolicy::Scripted, script: Some("z".into()), ..GameConfig::default() };
        assert!(matches!(cfg.spawner(), Err(ConfigError::Script(ScriptError::Letter('z')))));
        let cfg = GameConfig {
            spawn: SpawnPolicy::Scripted,
            script: Some("aB".into()),
            start_tiles: 2,
            ..GameConfig::default()
        };
        let (game, _) = cfg.new_game().unwrap();
        assert_eq!(game.board().to_symbols(), "12              ");
    }

    #[test]
    fn it_roundtrips_through_json() {
        let cfg = GameConfig { spawn: SpawnPolicy::Lfsr, ..GameConfig::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"spawn\":\"lfsr\""));
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), cfg);
    }
}
