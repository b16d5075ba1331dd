use crate::core::{Block, ContractRecord, SensorRecord, Status, UNSET};
use serde::Serialize;
use std::collections::BTreeMap;

/// The working draft of the next block, built up command by command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingRecord {
    pub contract_id: String,
    pub contractor_id: String,
    pub work_item: String,
    pub quantity: String,
    pub sensor_readings: SensorRecord,
    /// name -> 12-hex display digest
    pub hash_digests: BTreeMap<String, String>,
    #[serde(skip)]
    pub last_committed: Option<Block>,
    pub last_gas: String,
    /// Verdict of the most recent VALIDATE since the last commit
    pub validation: Option<Status>,
}

impl Default for PendingRecord {
    fn default() -> Self {
        PendingRecord {
            contract_id: UNSET.to_string(),
            contractor_id: UNSET.to_string(),
            work_item: UNSET.to_string(),
            quantity: "0".to_string(),
            sensor_readings: SensorRecord::default(),
            hash_digests: BTreeMap::new(),
            last_committed: None,
            last_gas: "0".to_string(),
            validation: None,
        }
    }
}

impl PendingRecord {
    pub fn contract_record(&self) -> ContractRecord {
        ContractRecord::new(
            &self.contract_id,
            &self.contractor_id,
            &self.work_item,
            &self.quantity,
        )
    }

    pub fn sensor_record(&self) -> SensorRecord {
        self.sensor_readings.clone()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let tx = match &self.last_committed {
            Some(block) => TxView {
                id: block.get_transaction_id().to_string(),
                gas: self.last_gas.clone(),
                status: block.get_status(),
            },
            None => TxView {
                id: UNSET.to_string(),
                gas: self.last_gas.clone(),
                status: Status::Locked,
            },
        };

        DisplaySnapshot {
            contract: self.contract_id.clone(),
            contractor: self.contractor_id.clone(),
            work: self.work_item.clone(),
            qty: self.quantity.clone(),
            sensor: self.sensor_readings.clone(),
            hashes: self.hash_digests.clone(),
            tx,
            validation: self.validation,
        }
    }
}

/// Read-only view handed to the presentation layer on DISPLAY
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub contract: String,
    pub contractor: String,
    pub work: String,
    pub qty: String,
    pub sensor: SensorRecord,
    pub hashes: BTreeMap<String, String>,
    pub tx: TxView,
    pub validation: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TxView {
    pub id: String,
    pub gas: String,
    pub status: Status,
}
