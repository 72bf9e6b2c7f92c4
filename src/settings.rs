//! Game settings and preferences
//!
//! Persisted separately from high scores. Unknown or malformed values fall
//! back to defaults instead of rejecting the whole document.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::BASE_SCROLL_SPEED;
use crate::error::{Error, Result};
use crate::persistence::JsonStore;

/// Longest accepted player name (characters)
pub const MAX_PLAYER_NAME_LEN: usize = 20;

/// Difficulty preference levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyPreference {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreference::Easy => "easy",
            DifficultyPreference::Normal => "normal",
            DifficultyPreference::Hard => "hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(DifficultyPreference::Easy),
            "normal" | "norm" => Some(DifficultyPreference::Normal),
            "hard" => Some(DifficultyPreference::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to the base scroll speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            DifficultyPreference::Easy => 0.8,
            DifficultyPreference::Normal => 1.0,
            DifficultyPreference::Hard => 1.3,
        }
    }

    /// Map a raw speed multiplier back to a preference.
    ///
    /// Only the three published multipliers are accepted; anything else
    /// (including NaN) selects `Normal`.
    pub fn from_multiplier(multiplier: f32) -> Self {
        [Self::Easy, Self::Normal, Self::Hard]
            .into_iter()
            .find(|p| (p.speed_multiplier() - multiplier).abs() < 1e-4)
            .unwrap_or_else(|| {
                log::warn!(
                    "Unsupported speed multiplier {}, using normal difficulty",
                    multiplier
                );
                Self::Normal
            })
    }

    /// Scroll speed at difficulty level 0
    pub fn base_speed(&self) -> f32 {
        BASE_SCROLL_SPEED * self.speed_multiplier()
    }
}

/// Background themes offered by the customization screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundTheme {
    #[default]
    Desert,
    Forest,
    Night,
    Rainbow,
    Space,
}

impl BackgroundTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundTheme::Desert => "desert",
            BackgroundTheme::Forest => "forest",
            BackgroundTheme::Night => "night",
            BackgroundTheme::Rainbow => "rainbow",
            BackgroundTheme::Space => "space",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "desert" => Some(BackgroundTheme::Desert),
            "forest" => Some(BackgroundTheme::Forest),
            "night" => Some(BackgroundTheme::Night),
            "rainbow" => Some(BackgroundTheme::Rainbow),
            "space" => Some(BackgroundTheme::Space),
            _ => None,
        }
    }
}

fn lenient_difficulty<'de, D>(deserializer: D) -> std::result::Result<DifficultyPreference, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(DifficultyPreference::from_name)
        .unwrap_or_default())
}

fn lenient_theme<'de, D>(deserializer: D) -> std::result::Result<BackgroundTheme, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(BackgroundTheme::from_name)
        .unwrap_or_default())
}

/// Trim and validate a player name
pub fn validate_player_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_PLAYER_NAME_LEN {
        return Err(Error::InvalidPlayerName {
            len,
            max: MAX_PLAYER_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Leaderboard name; anonymous sessions are never submitted
    pub player_name: Option<String>,

    // === Appearance ===
    /// Actor fill color (CSS hex)
    pub dino_color: String,
    #[serde(deserialize_with = "lenient_theme")]
    pub background_theme: BackgroundTheme,

    // === Audio ===
    pub sound_enabled: bool,

    // === Gameplay ===
    #[serde(deserialize_with = "lenient_difficulty")]
    pub difficulty_preference: DifficultyPreference,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: None,
            dino_color: "#4CAF50".to_string(),
            background_theme: BackgroundTheme::Desert,
            sound_enabled: true,
            difficulty_preference: DifficultyPreference::Normal,
        }
    }
}

impl Settings {
    /// Storage document name
    const STORAGE_KEY: &'static str = "settings";

    /// Scroll speed a new play starts at
    pub fn base_speed(&self) -> f32 {
        self.difficulty_preference.base_speed()
    }

    /// Set the leaderboard name (validated)
    pub fn set_player_name(&mut self, name: &str) -> Result<()> {
        let name = validate_player_name(name)?;
        log::info!("Player name set: {}", name);
        self.player_name = Some(name);
        Ok(())
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(store: &JsonStore) -> Self {
        match store.load::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                // A hand-edited name may not satisfy the rules any more
                if let Some(name) = settings.player_name.take() {
                    settings.player_name = validate_player_name(&name).ok();
                }
                log::info!(
                    "Loaded settings (difficulty: {})",
                    settings.difficulty_preference.as_str()
                );
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &JsonStore) -> Result<()> {
        store.save(Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
