//! Parse command line arguments
//! Small enough that clap would only cost compile time.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitTarget {
  /// The register map dump.
  Text,
  /// A JSON snapshot of every virtual register.
  Json,
}

/// Configuration options for this run.
#[derive(Debug)]
pub struct Config {
  pub verbose: bool,
  pub dump: bool,
  pub stats: bool,

  pub emit: EmitTarget,
  pub file: Option<String>,
}

impl Default for Config {
  /// Set your defaults here!
  fn default() -> Self {
    Config {
      verbose: false, // Debug logging of every map update
      dump: false,    // Also dump the map to stderr
      stats: false,   // Print allocation statistics

      emit: EmitTarget::Text, // Output format
      file: None,             // Replay file to run.
    }
  }
}

/// Parses command line input into a configuration. Panics on invalid args.
pub fn parse_args() -> Config {
  let args: Vec<String> = env::args().collect();
  parse_arg_list(&args[1..])
}

fn parse_arg_list(args: &[String]) -> Config {
  let mut config = Config::default();
  let mut index = 0;
  while index < args.len() {
    match args[index].as_str() {
      "-v" | "--verbose" => config.verbose = true,
      "--dump" => config.dump = true,
      "-s" | "--stats" => config.stats = true,
      "-e" | "--emit" => {
        // Allow for the emit type to be the next space-delimited token.
        if index + 1 < args.len() {
          config.emit = parse_emit(&args[index + 1]);
          index += 1;
        } else {
          panic!("Expected emit type");
        };
      }
      "-etext" => config.emit = EmitTarget::Text,
      "-ejson" => config.emit = EmitTarget::Json,
      file => {
        if let Some('-') = file.chars().next() {
          panic!("Unknown option : {}", file);
        } else {
          config.file = Some(file.to_string())
        }
      }
    };
    index += 1;
  }

  if config.file.is_none() {
    panic!("Expected file input");
  }

  config
}

fn parse_emit(name: &str) -> EmitTarget {
  match name {
    "text" => EmitTarget::Text,
    "json" => EmitTarget::Json,
    other => panic!("Unknown emit type : {}", other),
  }
}
