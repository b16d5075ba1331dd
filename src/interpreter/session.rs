use crate::core::{short_digest, Block, SharedLedger};
use crate::error::Result;
use crate::interpreter::command::{parse_script, Command};
use crate::interpreter::record::{DisplaySnapshot, PendingRecord};
use crate::wallet::coerce_amount;
use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

/// Non-fatal problems found while running a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnknownCommand {
        line: usize,
        keyword: String,
    },
    MissingArgument {
        line: usize,
        keyword: String,
        argument: String,
    },
}

#[derive(Debug, Clone)]
pub enum Event {
    Committed(Block),
    Displayed(DisplaySnapshot),
    Diagnostic(Diagnostic),
}

/// Everything a script run produced, in order
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub session_id: Uuid,
    pub record: PendingRecord,
    pub events: Vec<Event>,
    /// Keywords of the commands that ran
    pub actions: Vec<String>,
}

impl RunOutcome {
    pub fn committed(&self) -> Vec<&Block> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Committed(block) => Some(block),
                _ => None,
            })
            .collect()
    }

    pub fn last_committed(&self) -> Option<&Block> {
        self.committed().into_iter().last()
    }

    pub fn displays(&self) -> Vec<&DisplaySnapshot> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Displayed(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Diagnostic(diagnostic) => Some(diagnostic),
                _ => None,
            })
            .collect()
    }
}

/// Apply one command to the draft. Only GENERATE_TX touches the ledger.
pub fn step(
    mut record: PendingRecord,
    command: &Command,
    ledger: &SharedLedger,
) -> Result<(PendingRecord, Option<Event>)> {
    let event = match command {
        Command::Contract { id } => {
            record.contract_id = id.clone();
            None
        }
        Command::Contractor { id } => {
            record.contractor_id = id.clone();
            None
        }
        Command::RegisterWork {
            work_item,
            quantity,
        } => {
            record.work_item = work_item.clone();
            record.quantity = quantity.clone();
            None
        }
        Command::SensorData {
            moisture,
            ultrasonic,
            temperature,
        } => {
            record.sensor_readings.moisture = moisture.clone();
            record.sensor_readings.ultrasonic = ultrasonic.clone();
            record.sensor_readings.temperature = temperature.clone();
            None
        }
        Command::HashDetail { name, value } => {
            record
                .hash_digests
                .insert(name.clone(), short_digest(value.as_deref()));
            None
        }
        Command::Validate => {
            let verdict = ledger.preview(&record.contract_record(), &record.sensor_record())?;
            debug!("Validation verdict for {}: {verdict}", record.contract_id);
            record.validation = Some(verdict);
            None
        }
        Command::GenerateTx => {
            let gas = coerce_amount(&record.last_gas, "gas");
            let block = ledger.append(record.contract_record(), record.sensor_record(), gas)?;
            record.last_committed = Some(block.clone());
            record.validation = None;
            Some(Event::Committed(block))
        }
        Command::CalculateGas { value } => {
            record.last_gas = value.clone();
            None
        }
        Command::Display => Some(Event::Displayed(record.snapshot())),
        // Permissive parser: unknown commands change nothing
        Command::Unknown { .. } => None,
    };
    Ok((record, event))
}

/// One interpreter session against a shared ledger. Commands run strictly
/// in script order; the draft record is never shared between sessions.
pub struct Session {
    id: Uuid,
    ledger: SharedLedger,
}

impl Session {
    pub fn new(ledger: SharedLedger) -> Self {
        Session {
            id: Uuid::new_v4(),
            ledger,
        }
    }

    pub fn get_id(&self) -> Uuid {
        self.id
    }

    pub fn run(&self, script: &str) -> Result<RunOutcome> {
        self.run_from(PendingRecord::default(), script)
    }

    /// Continue from an existing draft, e.g. across several scripts
    pub fn run_from(&self, record: PendingRecord, script: &str) -> Result<RunOutcome> {
        let mut record = record;
        let mut events = Vec::new();
        let mut actions = Vec::new();

        for line in parse_script(script) {
            let command = match line.parsed {
                Ok(Command::Unknown { keyword }) => {
                    warn!(
                        "[session {}] line {}: ignoring unknown command {keyword}",
                        self.id, line.number
                    );
                    events.push(Event::Diagnostic(Diagnostic::UnknownCommand {
                        line: line.number,
                        keyword,
                    }));
                    continue;
                }
                Ok(command) => command,
                Err(missing) => {
                    warn!(
                        "[session {}] line {}: {} is missing its {} argument",
                        self.id, line.number, missing.keyword, missing.argument
                    );
                    events.push(Event::Diagnostic(Diagnostic::MissingArgument {
                        line: line.number,
                        keyword: missing.keyword.to_string(),
                        argument: missing.argument.to_string(),
                    }));
                    continue;
                }
            };

            let (next, event) = step(record, &command, &self.ledger)?;
            record = next;
            actions.push(command.keyword().to_string());
            if let Some(event) = event {
                events.push(event);
            }
        }

        let outcome = RunOutcome {
            session_id: self.id,
            record,
            events,
            actions,
        };
        info!(
            "[session {}] ran {} commands, {} committed",
            self.id,
            outcome.actions.len(),
            outcome.committed().len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AlwaysRelease, Ledger};

    fn shared() -> SharedLedger {
        SharedLedger::new(
            Ledger::with_policy(1_000_000.0, 5000.0, Box::new(AlwaysRelease)).unwrap(),
        )
    }

    #[test]
    fn test_step_is_a_pure_fold_without_commit() {
        let ledger = shared();
        let record = PendingRecord::default();
        let (record, event) = step(
            record,
            &Command::Contract {
                id: "C1".to_string(),
            },
            &ledger,
        )
        .unwrap();

        assert_eq!(record.contract_id, "C1");
        assert!(event.is_none());
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_validate_records_verdict_and_commit_clears_it() {
        let ledger = shared();
        let (record, _) = step(PendingRecord::default(), &Command::Validate, &ledger).unwrap();
        assert!(record.validation.is_some());

        let (record, event) = step(record, &Command::GenerateTx, &ledger).unwrap();
        assert!(record.validation.is_none());
        assert!(matches!(event, Some(Event::Committed(_))));
    }

    #[test]
    fn test_diagnostics_do_not_halt_the_run() {
        let session = Session::new(shared());
        let outcome = session
            .run("FOO bar\nCONTRACT\nCONTRACT C7\nGENERATE_TX")
            .unwrap();

        assert_eq!(
            outcome.diagnostics(),
            vec![
                &Diagnostic::UnknownCommand {
                    line: 1,
                    keyword: "FOO".to_string()
                },
                &Diagnostic::MissingArgument {
                    line: 2,
                    keyword: "CONTRACT".to_string(),
                    argument: "id".to_string()
                },
            ]
        );
        assert_eq!(outcome.committed().len(), 1);
        assert_eq!(outcome.actions, vec!["CONTRACT", "GENERATE_TX"]);
    }

    #[test]
    fn test_hash_detail_stores_short_digest() {
        let session = Session::new(shared());
        let outcome = session
            .run("HASH_DETAIL ContractID BRIDGE001\nHASH_DETAIL Empty")
            .unwrap();

        assert_eq!(outcome.record.hash_digests["ContractID"], "ddc8d0b0afbe");
        assert_eq!(outcome.record.hash_digests["Empty"], "e3b0c44298fc");
    }

    #[test]
    fn test_run_from_continues_a_draft() {
        let session = Session::new(shared());
        let first = session.run("CONTRACT C1\nCONTRACTOR A1").unwrap();
        let second = session
            .run_from(first.record, "REGISTER_WORK Steel 5\nGENERATE_TX")
            .unwrap();

        let block = second.last_committed().unwrap();
        let contract = block.get_contract_record().record().unwrap();
        assert_eq!(contract.id, "C1");
        assert_eq!(contract.work, "Steel");
    }
}
