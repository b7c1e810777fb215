//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "entity-viewer")]
#[command(about = "Browse a synthetic game's entities in the Kanan entity viewer")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Characters to place in the synthetic game
    #[arg(long, default_value_t = 24)]
    pub characters: usize,

    /// Items to place in the synthetic game
    #[arg(long, default_value_t = 40)]
    pub items: usize,

    /// Seed for the synthetic population
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Keep characters still instead of moving them every frame
    #[arg(long)]
    pub frozen: bool,

    /// Write the loaded config to the platform config directory and exit
    #[arg(long)]
    pub save_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["entity-viewer"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(cli.characters, 24);
        assert_eq!(cli.items, 40);
        assert_eq!(cli.seed, 7);
        assert!(!cli.frozen);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "entity-viewer",
            "--config",
            "kanan.toml",
            "--characters",
            "3",
            "--items",
            "0",
            "--seed",
            "99",
            "--frozen",
            "--save-config",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("kanan.toml")));
        assert_eq!(cli.characters, 3);
        assert_eq!(cli.items, 0);
        assert_eq!(cli.seed, 99);
        assert!(cli.frozen);
        assert!(cli.save_config);
    }

    #[test]
    fn test_rejects_negative_count() {
        assert!(Cli::try_parse_from(["entity-viewer", "--characters", "-1"]).is_err());
    }
}
