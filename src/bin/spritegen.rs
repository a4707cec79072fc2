use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spritegen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// Directory the PNG files are written to.
    #[arg(long, global = true, default_value = ".")]
    out_dir: PathBuf,

    /// Generator configuration JSON (defaults to the built-in recipes).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base seed for random pin lengths (overrides the config file).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Extra font search directory; may be repeated.
    #[arg(long = "font-dir", global = true)]
    font_dirs: Vec<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Chip icon with a text label and branching pins.
    Chip,
    /// Goal textures for every configured gate length.
    Goals,
    /// Striped t-shirt contact sheet of every palette pair.
    Tshirts,
    /// User/avatar icon.
    User,
    /// Every family.
    All,
}

impl Command {
    fn families(self) -> Vec<spritegen::Family> {
        use spritegen::Family;
        match self {
            Command::Chip => vec![Family::Chip],
            Command::Goals => vec![Family::Goals],
            Command::Tshirts => vec![Family::Tshirts],
            Command::User => vec![Family::User],
            Command::All => Family::ALL.to_vec(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => spritegen::SpriteConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => spritegen::SpriteConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let fonts = spritegen::SystemFontProvider::with_system_roots(cli.font_dirs.clone());
    let driver = spritegen::TextureBatchDriver::new(config, Box::new(fonts))?;
    tracing::info!(seed = driver.seed(), out_dir = %cli.out_dir.display(), "generating");

    let mut sink = spritegen::PngDirSink::new(cli.out_dir.clone());
    let report = driver.run(&cli.cmd.families(), &mut sink);

    for name in &report.written {
        eprintln!("wrote {}", sink.path_for(name).display());
    }
    if !report.is_success() {
        for f in &report.failures {
            eprintln!("failed {}: {}", f.family, f.error);
        }
        anyhow::bail!("{} of the requested passes failed", report.failures.len());
    }
    Ok(())
}
