use std::path::{Path, PathBuf};

use clap::Parser;

use mention::config::{self, ConfigError, MentionConfig};

/// Demo composer with an @-mention suggestion overlay.
#[derive(Parser)]
#[command(name = "mention", version, about)]
struct Cli {
    /// Directory the file and folder groups index (defaults to the cwd)
    root: Option<PathBuf>,

    /// Explicit config file (defaults to ./mention.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = mention::tui::run(&config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<MentionConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
            config::load(&cwd)?
        }
    };
    if cli.root.is_some() {
        config.root = cli.root.clone();
    }
    Ok(config)
}
