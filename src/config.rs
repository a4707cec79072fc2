use std::path::Path;

use crate::{
    families::{chip::ChipConfig, goal::GoalConfig, tshirt::TshirtConfig, user::UserConfig},
    foundation::error::{SpriteError, SpriteResult},
};

/// Top-level generator configuration, one section per texture family.
///
/// Every field is optional in JSON; missing sections and fields fall back to
/// the reference recipe values.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Base seed for the per-pass random streams. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub chip: ChipConfig,
    pub goal: GoalConfig,
    pub tshirt: TshirtConfig,
    pub user: UserConfig,
}

impl SpriteConfig {
    pub fn from_json_str(s: &str) -> SpriteResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| SpriteError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> SpriteResult<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| SpriteError::io(format!("read config '{}': {e}", path.display())))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> SpriteResult<()> {
        self.chip.validate()?;
        self.goal.validate()?;
        self.tshirt.validate()?;
        self.user.validate()
    }
}
