use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `aaas` - guardrails and admission control for apology generation.
#[derive(Parser, Debug)]
#[command(name = "aaas")]
#[command(version)]
#[command(about = "Apology-as-a-Service guardrail and admission tooling.", long_about = None)]
pub struct Cli {
    /// Config file (default: `~/.aaas/config.toml`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of config
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply severity clamps and strategy rules to a generate request
    Guard {
        /// Path to a generate request JSON file
        request: PathBuf,
    },

    /// Print the prompts a guarded request would send to the model
    Prompt {
        /// Path to a generate request JSON file
        request: PathBuf,
    },

    /// Run admission decisions against the configured counter store
    Admit {
        /// Client identifier (API client id or IP address)
        #[arg(long)]
        client: String,

        /// Treat the client as authenticated (higher limit)
        #[arg(long)]
        authenticated: bool,

        /// Number of consecutive admission attempts
        #[arg(long, default_value = "1")]
        times: u32,
    },

    /// Screen text against the moderation policy
    Moderate {
        /// Text to screen
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_admit_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "aaas",
            "admit",
            "--client",
            "10.0.0.1",
            "--times",
            "3",
            "--verbose",
            "--config",
            "/tmp/aaas.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/aaas.toml")));
        match cli.command {
            Commands::Admit {
                client,
                authenticated,
                times,
            } => {
                assert_eq!(client, "10.0.0.1");
                assert!(!authenticated);
                assert_eq!(times, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn admit_requires_client() {
        assert!(Cli::try_parse_from(["aaas", "admit"]).is_err());
    }
}
