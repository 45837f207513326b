use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use atomic_css::compression::{generate, CompressionMap};
use clap::Parser;

/// Assign short aliases to every atomic class found in the given stylesheets.
#[derive(Parser, Debug)]
#[command(name = "compression-map")]
pub struct CompressionMapCommand {
  /// Stylesheets to scan, read in the given order
  #[arg(long, required = true, num_args = 1..)]
  pub css: Vec<PathBuf>,
  /// Map from a previous build; its entries are kept as they are
  #[arg(long)]
  pub previous: Option<PathBuf>,
  /// Where to write the resulting map
  #[arg(long)]
  pub out: PathBuf,
  /// Increase logging verbosity (-v debug, -vv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => tracing::Level::INFO,
    1 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };
  let _ = tracing_subscriber::fmt::SubscriberBuilder::default()
    .with_max_level(level)
    .with_writer(std::io::stderr)
    .try_init();
}

fn read_previous(path: &Path) -> anyhow::Result<CompressionMap> {
  let contents =
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Write through a temporary file in the target directory and rename it into
/// place, so readers never observe a partially written map.
fn persist_map(path: &Path, map: &CompressionMap) -> anyhow::Result<()> {
  let directory = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  };
  let mut file = tempfile::NamedTempFile::new_in(&directory)?;
  serde_json::to_writer_pretty(&mut file, map)?;
  file.write_all(b"\n")?;
  file.flush()?;
  file
    .persist(path)
    .with_context(|| format!("writing {}", path.display()))?;
  Ok(())
}

fn main() -> anyhow::Result<()> {
  let args = CompressionMapCommand::parse();
  init_tracing(args.verbose);

  let mut css = String::new();
  for path in &args.css {
    let contents =
      std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    css.push_str(&contents);
    css.push('\n');
  }

  let previous = args.previous.as_deref().map(read_previous).transpose()?;
  let map = generate(&css, previous.as_ref());
  persist_map(&args.out, &map)?;

  tracing::info!(
    entries = map.len(),
    out = %args.out.display(),
    "wrote compression map"
  );
  Ok(())
}
