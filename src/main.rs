// This is the entry point for the ledger CLI
// Every subcommand builds its own ledger from settings, nothing is global except the env defaults
use bharat_chain::{
    read_chain, server, verify_chain_with_policy, write_chain, Command, Ledger, Opt, Presenter,
    Session, Settings, SharedLedger, TerminalPresenter, GLOBAL_CONFIG,
};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::Path;
use std::process;

// The bridge-works script I use for demos
const DEMO_SCRIPT: &str = include_str!("../demos/bridge_works.dsl");

fn main() {
    // Info level by default; RUST_LOG still wins when it is set
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, Box<dyn std::error::Error>> {
    let settings = match path {
        Some(path) => Settings::load(Some(path))?,
        None => {
            let settings = GLOBAL_CONFIG.clone();
            settings.validate()?;
            settings
        }
    };
    Ok(settings)
}

fn run_command(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = load_settings(opt.config.as_deref())?;

    match opt.command {
        // When I want to replay a script file against a brand new ledger
        Command::Run { script, export } => {
            let text = std::fs::read_to_string(&script)
                .map_err(|e| format!("Failed to read {}: {e}", script.display()))?;
            run_script(&settings, &text, export.as_deref())?;
        }
        Command::Demo { export } => {
            println!("--- Bharat Chain runtime interpreter ---");
            run_script(&settings, DEMO_SCRIPT, export.as_deref())?;
            println!("--- Deployment complete ---");
        }
        // When I want the HTTP API, one shared ledger lives as long as the server
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                settings.listen_addr = addr;
            }
            let ledger = SharedLedger::new(Ledger::new(&settings)?);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(&settings, ledger))?;
        }
        Command::Verify { chain } => {
            // Statuses are checked against the configured settlement mode
            let policy = settings.settlement.mode.build(&settings.settlement);
            let blocks = read_chain(&chain)?;
            verify_chain_with_policy(&blocks, policy.as_ref())?;
            println!(
                "Chain in {} is valid ({} blocks, settled by {})",
                chain.display(),
                blocks.len(),
                policy.name()
            );
        }
    }
    Ok(())
}

fn run_script(
    settings: &Settings,
    script: &str,
    export: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = SharedLedger::new(Ledger::new(settings)?);
    let session = Session::new(ledger.clone());
    let outcome = session.run(script)?;

    let mut presenter = TerminalPresenter::stdout();
    presenter.events(&outcome.events)?;
    presenter.wallet(&ledger.wallet()?)?;

    // I re-verify the whole chain so a bad run never gets exported
    ledger.verify()?;
    info!("Chain verified: {} blocks", ledger.len()?);

    if let Some(path) = export {
        write_chain(path, &ledger.blocks()?)?;
        println!("Chain exported to {}", path.display());
    }
    Ok(())
}
