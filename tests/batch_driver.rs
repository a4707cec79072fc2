use ab_glyph::FontVec;
use spritegen::{
    Family, FontProvider, MemorySink, SpriteConfig, SpriteError, SpriteResult,
    TextureBatchDriver,
};

struct NoFonts;
impl FontProvider for NoFonts {
    fn load(&self, name: &str) -> SpriteResult<FontVec> {
        Err(SpriteError::missing_resource(format!("no font '{name}'")))
    }
}

fn config(seed: u64) -> SpriteConfig {
    let mut cfg = SpriteConfig {
        seed: Some(seed),
        ..SpriteConfig::default()
    };
    cfg.chip.label = None;
    cfg.chip.pins = vec![spritegen::PinSpec::random(0); 6];
    cfg
}

#[test]
fn full_batch_writes_every_reference_file() {
    let driver = TextureBatchDriver::new(config(11), Box::new(NoFonts)).unwrap();
    let mut sink = MemorySink::new();
    let report = driver.run(&Family::ALL, &mut sink);
    assert!(report.is_success(), "{:?}", report.failures);

    let mut expected = vec!["chip.png".to_string()];
    expected.extend((2..=20).step_by(2).map(|g| format!("goal_{g:02}.png")));
    expected.push("tshirt_grid.png".to_string());
    expected.push("user.png".to_string());
    assert_eq!(report.written, expected);

    let chip = sink.get("chip.png").unwrap();
    assert_eq!((chip.width(), chip.height()), (128, 128));
    assert_eq!(sink.get("user.png").unwrap().width(), 128);
    assert_eq!(sink.get("goal_20.png").unwrap().width(), 20 * 128);
}

#[test]
fn same_seed_reproduces_random_pins() {
    let render = |seed| {
        let driver = TextureBatchDriver::new(config(seed), Box::new(NoFonts)).unwrap();
        let mut sink = MemorySink::new();
        driver.run_family(Family::Chip, &mut sink).unwrap();
        sink.get("chip.png").unwrap().clone()
    };
    assert_eq!(render(21), render(21));
}

#[test]
fn chip_pass_is_independent_of_other_passes() {
    let driver = TextureBatchDriver::new(config(4), Box::new(NoFonts)).unwrap();
    let mut alone = MemorySink::new();
    driver.run(&[Family::Chip], &mut alone);
    let mut after_others = MemorySink::new();
    driver.run(&[Family::User, Family::Chip], &mut after_others);
    assert!(alone.get("chip.png").is_some());
    assert_eq!(alone.get("chip.png"), after_others.get("chip.png"));
}

#[test]
fn missing_font_fails_only_the_chip_pass() {
    let mut cfg = config(1);
    cfg.chip.label = Some("AI".to_string());
    let driver = TextureBatchDriver::new(cfg, Box::new(NoFonts)).unwrap();
    let mut sink = MemorySink::new();
    let report = driver.run(&[Family::Chip, Family::User], &mut sink);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].family, Family::Chip);
    assert_eq!(report.written, vec!["user.png"]);
}
