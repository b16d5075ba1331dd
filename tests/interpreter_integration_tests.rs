//! Interpreter integration tests
//!
//! Runs whole scripts through a session and checks what reaches the ledger.

use bharat_chain::{
    AlwaysRelease, ContractRecord, Diagnostic, Ledger, Payload, Presenter, SensorBounds,
    SensorRecord, Session, SettlementSettings, SharedLedger, Status, TerminalPresenter,
};

fn shared() -> SharedLedger {
    SharedLedger::new(Ledger::with_policy(1_000_000.0, 5000.0, Box::new(AlwaysRelease)).unwrap())
}

fn bounded() -> SharedLedger {
    let policy = SensorBounds::from_settings(&SettlementSettings::default());
    SharedLedger::new(Ledger::with_policy(1_000_000.0, 5000.0, Box::new(policy)).unwrap())
}

const BRIDGE_SCRIPT: &str = "\
CONTRACT BRIDGE001
CONTRACTOR ABC_CONTRACTOR
REGISTER_WORK Layer1Bricks 100
SENSOR_DATA 12 0.85 30
HASH_DETAIL ContractID BRIDGE001
VALIDATE
GENERATE_TX
CALCULATE_GAS 0.5
DISPLAY
";

#[test]
fn test_bridge_script_commits_one_block() {
    let ledger = shared();
    let outcome = Session::new(ledger.clone()).run(BRIDGE_SCRIPT).unwrap();

    assert_eq!(outcome.committed().len(), 1);
    assert!(outcome.diagnostics().is_empty());
    assert_eq!(ledger.len().unwrap(), 2);

    let block = outcome.last_committed().unwrap();
    let contract = block.get_contract_record().record().unwrap();
    assert_eq!(contract.id, "BRIDGE001");
    assert_eq!(contract.contractor, "ABC_CONTRACTOR");
    assert_eq!(contract.work, "Layer1Bricks");
    assert_eq!(contract.qty, "100");
    let sensor = block.get_sensor_record().record().unwrap();
    assert_eq!(sensor.ultrasonic, "0.85");
    assert_eq!(block.get_status(), Status::Released);

    // Gas was set after the commit, so the first commit paid none
    let wallet = ledger.wallet().unwrap();
    assert_eq!(wallet.balance, 995_000.0);
    assert_eq!(wallet.gas_spent, 0.0);

    let display = outcome.displays()[0];
    assert_eq!(display.tx.id, block.get_transaction_id());
    assert_eq!(display.tx.gas, "0.5");
    assert_eq!(display.hashes["ContractID"], "ddc8d0b0afbe");
}

#[test]
fn test_gas_set_before_commit_is_charged() {
    let ledger = shared();
    Session::new(ledger.clone())
        .run("CONTRACT C1\nCALCULATE_GAS 0.25\nGENERATE_TX\nGENERATE_TX")
        .unwrap();

    let wallet = ledger.wallet().unwrap();
    assert_eq!(wallet.transaction_count, 2);
    assert_eq!(wallet.gas_spent, 0.5);
    assert_eq!(wallet.balance, 1_000_000.0 - 2.0 * 5000.25);
}

#[test]
fn test_committed_blocks_are_snapshots() {
    let ledger = shared();
    let outcome = Session::new(ledger.clone())
        .run("CONTRACT X\nGENERATE_TX\nCONTRACT Y\nGENERATE_TX")
        .unwrap();

    let ids: Vec<String> = outcome
        .committed()
        .iter()
        .map(|b| b.get_contract_record().record().unwrap().id.clone())
        .collect();
    assert_eq!(ids, vec!["X", "Y"]);

    let blocks = ledger.blocks().unwrap();
    assert_eq!(blocks[1].get_contract_record().record().unwrap().id, "X");
    assert_eq!(blocks[2].get_contract_record().record().unwrap().id, "Y");
    assert!(ledger.verify().is_ok());
}

#[test]
fn test_register_work_between_commits_does_not_rewrite_history() {
    let ledger = shared();
    Session::new(ledger.clone())
        .run("REGISTER_WORK X 10\nGENERATE_TX\nREGISTER_WORK Y 20\nGENERATE_TX")
        .unwrap();

    let blocks = ledger.blocks().unwrap();
    assert_eq!(blocks.len(), 3);
    let first = blocks[1].get_contract_record().record().unwrap();
    assert_eq!((first.work.as_str(), first.qty.as_str()), ("X", "10"));
    let second = blocks[2].get_contract_record().record().unwrap();
    assert_eq!((second.work.as_str(), second.qty.as_str()), ("Y", "20"));
    assert!(ledger.verify().is_ok());
}

#[test]
fn test_single_commit_scenario() {
    let ledger = shared();
    let genesis_hash = ledger.blocks().unwrap()[0].get_hash().to_string();

    let outcome = Session::new(ledger.clone())
        .run(
            "CONTRACT C1\nCONTRACTOR A1\nREGISTER_WORK Bricks 100\n\
             SENSOR_DATA 12 0.85 30\nCALCULATE_GAS 0.5\nGENERATE_TX",
        )
        .unwrap();

    let block = outcome.last_committed().unwrap();
    assert_eq!(block.get_index(), 1);
    assert_eq!(block.get_previous_hash(), genesis_hash);
    assert_eq!(
        block.get_contract_record(),
        &Payload::Record(ContractRecord::new("C1", "A1", "Bricks", "100"))
    );
    assert_eq!(
        block.get_sensor_record(),
        &Payload::Record(SensorRecord::new("12", "0.85", "30"))
    );
    assert_eq!(block.get_status(), Status::Released);
    assert!(block.get_transaction_id().starts_with("IND-"));

    let wallet = ledger.wallet().unwrap();
    assert_eq!(wallet.balance, 994_999.5);
    assert_eq!(wallet.gas_spent, 0.5);
    assert_eq!(wallet.transaction_count, 1);
}

#[test]
fn test_display_before_any_command_shows_defaults() {
    let outcome = Session::new(shared()).run("DISPLAY").unwrap();
    let display = outcome.displays()[0];

    assert_eq!(display.contract, "N/A");
    assert_eq!(display.contractor, "N/A");
    assert_eq!(display.work, "N/A");
    assert_eq!(display.qty, "0");
    assert_eq!(display.sensor.moisture, "0");
    assert_eq!(display.tx.id, "N/A");
    assert_eq!(display.tx.status, Status::Locked);
    assert!(display.hashes.is_empty());
}

#[test]
fn test_sensor_bounds_locks_out_of_range_readings() {
    let ledger = bounded();

    let outcome = Session::new(ledger.clone())
        .run(
            "CONTRACT C1\nCONTRACTOR A1\nREGISTER_WORK Bricks 100\n\
             SENSOR_DATA 35 0.5 30\nVALIDATE\nGENERATE_TX\nDISPLAY",
        )
        .unwrap();

    let block = outcome.last_committed().unwrap();
    assert_eq!(block.get_status(), Status::Locked);
    assert_eq!(outcome.displays()[0].tx.status, Status::Locked);

    let wallet = ledger.wallet().unwrap();
    assert_eq!(wallet.balance, 1_000_000.0);
    assert_eq!(wallet.transaction_count, 1);
}

#[test]
fn test_sensor_bounds_releases_good_readings() {
    let ledger = bounded();

    let outcome = Session::new(ledger.clone()).run(BRIDGE_SCRIPT).unwrap();
    assert_eq!(outcome.last_committed().unwrap().get_status(), Status::Released);
    assert_eq!(ledger.wallet().unwrap().balance, 995_000.0);
}

#[test]
fn test_missing_arguments_are_reported_and_skipped() {
    let ledger = shared();
    let outcome = Session::new(ledger.clone())
        .run("CONTRACT C1\nREGISTER_WORK\nSENSOR_DATA 10\nWIRE_FUNDS 10\nGENERATE_TX")
        .unwrap();

    let diagnostics = outcome.diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert!(matches!(
        diagnostics[0],
        Diagnostic::MissingArgument { line: 2, .. }
    ));
    assert!(matches!(
        diagnostics[1],
        Diagnostic::UnknownCommand { line: 4, .. }
    ));

    // SENSOR_DATA with one reading fills the rest with zeros
    let block = outcome.last_committed().unwrap();
    let sensor = block.get_sensor_record().record().unwrap();
    assert_eq!(sensor.moisture, "10");
    assert_eq!(sensor.ultrasonic, "0");
    assert_eq!(sensor.temperature, "0");
}

#[test]
fn test_sessions_share_the_ledger_but_not_drafts() {
    let ledger = shared();
    let first = Session::new(ledger.clone());
    let second = Session::new(ledger.clone());
    assert_ne!(first.get_id(), second.get_id());

    first.run("CONTRACT A\nGENERATE_TX").unwrap();
    let outcome = second.run("GENERATE_TX").unwrap();

    let block = outcome.last_committed().unwrap();
    let contract = block.get_contract_record().record().unwrap();
    assert_eq!(contract.id, "N/A");
    assert_eq!(ledger.len().unwrap(), 3);
}

#[test]
fn test_presenter_renders_a_run() {
    let outcome = Session::new(shared()).run(BRIDGE_SCRIPT).unwrap();
    let mut presenter = TerminalPresenter::new(Vec::new());
    presenter.events(&outcome.events).unwrap();
    let text = String::from_utf8(presenter.into_inner()).unwrap();

    assert!(text.contains("block #1 committed"));
    assert!(text.contains("Contract: BRIDGE001"));
    assert!(text.contains("ContractID: ddc8d0b0afbe"));
}
