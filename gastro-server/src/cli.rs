//! Command line

use clap::{Parser, Subcommand};

use crate::setup::SetupArgs;

#[derive(Debug, Parser)]
#[command(name = "gastro-server", version, about = "Familia Gastro ordering server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Migrate the database and run installation tasks
    Setup(SetupArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["gastro-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_setup_flags() {
        let cli = Cli::try_parse_from([
            "gastro-server",
            "setup",
            "--create-superuser",
            "root",
            "root@example.com",
            "s3cret-pass",
            "--load-sample-data",
        ])
        .unwrap();
        let Some(Command::Setup(args)) = cli.command else {
            panic!("expected setup");
        };
        assert_eq!(
            args.create_superuser.as_deref(),
            Some(&["root".to_string(), "root@example.com".into(), "s3cret-pass".into()][..])
        );
        assert!(args.load_sample_data);
        assert!(!args.generate_secret_key);
    }

    #[test]
    fn test_superuser_needs_three_values() {
        let err = Cli::try_parse_from(["gastro-server", "setup", "--create-superuser", "root"]);
        assert!(err.is_err());
    }
}
