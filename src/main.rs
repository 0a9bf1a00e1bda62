//! Top Level Environment
//! Replays an allocation log against a register map and prints the result.

use std::path::Path;

use anyhow::Result;

use vrm::{args, emit, registers::x86_64::X86_64, replay};

/// Logs go to stderr so they never mix with the rendered map on stdout.
fn logger(verbose: bool) -> env_logger::Builder {
  let mut builder = env_logger::builder();
  builder
    .target(env_logger::Target::Stderr)
    .format_timestamp(None)
    .filter_level(if verbose {
      log::LevelFilter::Debug
    } else {
      log::LevelFilter::Warn
    })
    .parse_default_env();
  builder
}

fn main() {
  let cfg = args::parse_args();
  logger(cfg.verbose).init();

  let code = match run(&cfg) {
    Ok(()) => 0,
    Err(e) => {
      eprintln!("{:#}", e);
      1
    }
  };
  std::process::exit(code);
}

fn run(cfg: &args::Config) -> Result<()> {
  let filename = cfg.file.as_deref().unwrap_or_default();
  let file = replay::ReplayFile::load(Path::new(filename))?;
  print!("{}", render_replay(&file, cfg)?);
  Ok(())
}

fn render_replay(file: &replay::ReplayFile, cfg: &args::Config) -> Result<String> {
  let target = X86_64::new();
  let (mf, vrm) = replay::replay(file, &target)?;

  if cfg.dump {
    vrm.dump(mf.reg_info());
  }
  emit::render(&vrm, &mf, cfg.emit, cfg.stats)
}
