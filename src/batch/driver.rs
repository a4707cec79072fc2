//! Runs every texture family as an isolated pass and hands the results to a sink.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    batch::sink::{ContactSheet, ImageSink},
    config::SpriteConfig,
    families::{
        chip::render_chip,
        goal::{GoalConfig, render_goal},
        tshirt::render_tshirt,
        user::render_user,
    },
    foundation::error::{SpriteError, SpriteResult},
    raster::text::FontProvider,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Chip,
    Goals,
    Tshirts,
    User,
}

impl Family {
    pub const ALL: [Family; 4] = [Family::Chip, Family::Goals, Family::Tshirts, Family::User];

    pub fn name(self) -> &'static str {
        match self {
            Family::Chip => "chip",
            Family::Goals => "goals",
            Family::Tshirts => "tshirts",
            Family::User => "user",
        }
    }

    /// Stable stream index mixed into the base seed.
    fn stream(self) -> u64 {
        match self {
            Family::Chip => 1,
            Family::Goals => 2,
            Family::Tshirts => 3,
            Family::User => 4,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct PassFailure {
    pub family: Family,
    pub error: SpriteError,
}

/// Outcome of a batch: every file written plus the passes that failed.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<String>,
    pub failures: Vec<PassFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub const CHIP_FILE: &str = "chip.png";
pub const TSHIRT_GRID_FILE: &str = "tshirt_grid.png";
pub const USER_FILE: &str = "user.png";

pub struct TextureBatchDriver {
    config: SpriteConfig,
    fonts: Box<dyn FontProvider>,
    seed: u64,
}

impl TextureBatchDriver {
    /// Validates `config` and fixes the base seed (drawn from OS entropy when
    /// the config leaves it unset).
    pub fn new(config: SpriteConfig, fonts: Box<dyn FontProvider>) -> SpriteResult<Self> {
        config.validate()?;
        let seed = match config.seed {
            Some(s) => s,
            None => {
                let s = rand::random::<u64>();
                tracing::info!(seed = s, "no seed configured; drew one from entropy");
                s
            }
        };
        Ok(Self {
            config,
            fonts,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SpriteConfig {
        &self.config
    }

    /// Random stream for one pass; independent of which other passes run.
    pub fn pass_rng(&self, family: Family) -> StdRng {
        StdRng::seed_from_u64(mix64(self.seed ^ family.stream()))
    }

    /// Runs one family, returning the names it saved. Stops at the first error.
    #[tracing::instrument(skip(self, sink), fields(seed = self.seed))]
    pub fn run_family(&self, family: Family, sink: &mut dyn ImageSink) -> SpriteResult<Vec<String>> {
        let mut written = Vec::new();
        match family {
            Family::Chip => {
                let mut rng = self.pass_rng(family);
                let sprite = render_chip(&self.config.chip, self.fonts.as_ref(), &mut rng)?;
                sink.save(CHIP_FILE, &sprite)?;
                written.push(CHIP_FILE.to_string());
            }
            Family::Goals => {
                for &g in &self.config.goal.gate_lengths {
                    let name = GoalConfig::file_name(g);
                    let sprite = render_goal(&self.config.goal, g)?;
                    sink.save(&name, &sprite)?;
                    written.push(name);
                }
            }
            Family::Tshirts => {
                let cfg = &self.config.tshirt;
                let layout = cfg.layout()?;
                let n = u32::try_from(cfg.palette.len())
                    .map_err(|_| SpriteError::validation("t-shirt palette is too large"))?;
                let mut sheet = ContactSheet::new(n, n, layout.width, layout.height)?;
                for (row, &first) in (0u32..).zip(&cfg.palette) {
                    for (col, &second) in (0u32..).zip(&cfg.palette) {
                        let shirt = render_tshirt(cfg, first, second)?;
                        sheet.paste(row, col, &shirt)?;
                    }
                }
                sink.save(TSHIRT_GRID_FILE, sheet.as_surface())?;
                written.push(TSHIRT_GRID_FILE.to_string());
            }
            Family::User => {
                let sprite = render_user(&self.config.user)?;
                sink.save(USER_FILE, &sprite)?;
                written.push(USER_FILE.to_string());
            }
        }
        tracing::info!(count = written.len(), "pass complete");
        Ok(written)
    }

    /// Runs each family in order. A failing pass is logged and recorded; the
    /// remaining passes still run.
    pub fn run(&self, families: &[Family], sink: &mut dyn ImageSink) -> BatchReport {
        let mut report = BatchReport::default();
        for &family in families {
            match self.run_family(family, sink) {
                Ok(names) => report.written.extend(names),
                Err(error) => {
                    tracing::error!(%family, %error, "pass failed");
                    report.failures.push(PassFailure { family, error });
                }
            }
        }
        report
    }
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use ab_glyph::FontVec;
    use rand::RngCore;

    use super::*;
    use crate::batch::sink::MemorySink;

    struct NoFonts;
    impl FontProvider for NoFonts {
        fn load(&self, name: &str) -> SpriteResult<FontVec> {
            Err(SpriteError::missing_resource(format!("no font '{name}'")))
        }
    }

    fn driver(seed: u64) -> TextureBatchDriver {
        let mut config = SpriteConfig {
            seed: Some(seed),
            ..SpriteConfig::default()
        };
        config.goal.gate_lengths = vec![2, 4];
        TextureBatchDriver::new(config, Box::new(NoFonts)).unwrap()
    }

    #[test]
    fn pass_streams_differ_per_family_and_repeat_per_seed() {
        let d = driver(5);
        let a = d.pass_rng(Family::Chip).next_u64();
        assert_eq!(a, d.pass_rng(Family::Chip).next_u64());
        assert_ne!(a, d.pass_rng(Family::User).next_u64());
        assert_ne!(a, driver(6).pass_rng(Family::Chip).next_u64());
    }

    #[test]
    fn goals_pass_writes_one_file_per_gate_length() {
        let mut sink = MemorySink::new();
        let names = driver(1).run_family(Family::Goals, &mut sink).unwrap();
        assert_eq!(names, vec!["goal_02.png", "goal_04.png"]);
        assert_eq!(sink.get("goal_04.png").unwrap().width(), 512);
    }

    #[test]
    fn tshirt_grid_is_palette_squared() {
        let mut sink = MemorySink::new();
        driver(1).run_family(Family::Tshirts, &mut sink).unwrap();
        let grid = sink.get(TSHIRT_GRID_FILE).unwrap();
        assert_eq!((grid.width(), grid.height()), (6 * 64, 6 * 80));
    }

    #[test]
    fn failed_pass_does_not_stop_the_batch() {
        let mut sink = MemorySink::new();
        let report = driver(1).run(&Family::ALL, &mut sink);
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].family, Family::Chip);
        assert!(matches!(
            report.failures[0].error,
            SpriteError::MissingResource(_)
        ));
        assert_eq!(
            report.written,
            vec!["goal_02.png", "goal_04.png", TSHIRT_GRID_FILE, USER_FILE]
        );
        assert_eq!(sink.names(), report.written);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = SpriteConfig::default();
        config.tshirt.palette.clear();
        assert!(TextureBatchDriver::new(config, Box::new(NoFonts)).is_err());
    }
}
