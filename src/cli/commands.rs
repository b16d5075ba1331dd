use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bharat-chain", about = "Work-attestation ledger")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "run", about = "Run a command script against a fresh ledger")]
    Run {
        #[arg(help = "Script file, one command per line")]
        script: PathBuf,
        #[arg(long = "export", help = "Write the final chain as JSON to this file")]
        export: Option<PathBuf>,
    },
    #[command(name = "demo", about = "Run the bundled bridge-works script")]
    Demo {
        #[arg(long = "export", help = "Write the final chain as JSON to this file")]
        export: Option<PathBuf>,
    },
    #[command(name = "serve", about = "Start the HTTP API")]
    Serve {
        #[arg(long = "addr", help = "Listen address, overrides the configured one")]
        addr: Option<String>,
    },
    #[command(name = "verify", about = "Verify the integrity of an exported chain")]
    Verify {
        #[arg(help = "Chain JSON written by --export")]
        chain: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_export() {
        let opt = Opt::parse_from(["bharat-chain", "run", "works.dsl", "--export", "out.json"]);
        match opt.command {
            Command::Run { script, export } => {
                assert_eq!(script, PathBuf::from("works.dsl"));
                assert_eq!(export, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let opt = Opt::parse_from(["bharat-chain", "serve", "--config", "node.toml"]);
        assert_eq!(opt.config, Some(PathBuf::from("node.toml")));
        assert!(matches!(opt.command, Command::Serve { addr: None }));
    }
}
