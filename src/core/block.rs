use crate::core::hash::{content_hash, derive_transaction_id};
use crate::core::settlement::{SettlementPolicy, Status};
use serde::{Deserialize, Serialize};

/// Payload text carried by the genesis block in place of real records
pub const GENESIS_SENTINEL: &str = "Genesis";

/// Previous-hash value of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Placeholder for record fields nobody has set
pub const UNSET: &str = "N/A";

/// Declared work under a contract. Field order is part of the hash input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: String,
    pub contractor: String,
    pub work: String,
    pub qty: String,
}

impl ContractRecord {
    pub fn new(id: &str, contractor: &str, work: &str, qty: &str) -> Self {
        ContractRecord {
            id: id.to_string(),
            contractor: contractor.to_string(),
            work: work.to_string(),
            qty: qty.to_string(),
        }
    }
}

/// Raw sensor readings, kept as the strings they were reported as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub moisture: String,
    pub ultrasonic: String,
    pub temperature: String,
}

impl SensorRecord {
    pub fn new(moisture: &str, ultrasonic: &str, temperature: &str) -> Self {
        SensorRecord {
            moisture: moisture.to_string(),
            ultrasonic: ultrasonic.to_string(),
            temperature: temperature.to_string(),
        }
    }
}

impl Default for SensorRecord {
    fn default() -> Self {
        SensorRecord::new("0", "0", "0")
    }
}

/// A block payload: a typed record, or the genesis sentinel string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Record(T),
    Sentinel(String),
}

impl<T> Payload<T> {
    pub fn genesis() -> Self {
        Payload::Sentinel(GENESIS_SENTINEL.to_string())
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            Payload::Record(record) => Some(record),
            Payload::Sentinel(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: i64,
    contract_record: Payload<ContractRecord>,
    sensor_record: Payload<SensorRecord>,
    previous_hash: String,
    transaction_id: String,
    status: Status,
    hash: String,
}

impl Block {
    /// Build a block over real records. The settlement status is decided by
    /// `policy`; transaction ID and hash are derived from the fields.
    pub fn new_block(
        index: u64,
        timestamp: i64,
        previous_hash: String,
        contract: ContractRecord,
        sensor: SensorRecord,
        policy: &dyn SettlementPolicy,
    ) -> Block {
        let status = policy.settle(&contract, &sensor);
        Self::assemble(
            index,
            timestamp,
            previous_hash,
            Payload::Record(contract),
            Payload::Record(sensor),
            status,
        )
    }

    /// The genesis block has nothing to settle and is always RELEASED.
    pub fn generate_genesis_block(timestamp: i64) -> Block {
        Self::assemble(
            0,
            timestamp,
            String::from(GENESIS_PREVIOUS_HASH),
            Payload::genesis(),
            Payload::genesis(),
            Status::Released,
        )
    }

    fn assemble(
        index: u64,
        timestamp: i64,
        previous_hash: String,
        contract_record: Payload<ContractRecord>,
        sensor_record: Payload<SensorRecord>,
        status: Status,
    ) -> Block {
        let transaction_id = derive_transaction_id(&contract_record, &sensor_record, timestamp);
        let mut block = Block {
            index,
            timestamp,
            contract_record,
            sensor_record,
            previous_hash,
            transaction_id,
            status,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Recompute the content hash from this block's own fields
    pub fn calculate_hash(&self) -> String {
        content_hash(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.contract_record,
            &self.sensor_record,
            &self.transaction_id,
        )
    }

    pub fn is_self_consistent(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_contract_record(&self) -> &Payload<ContractRecord> {
        &self.contract_record
    }

    pub fn get_sensor_record(&self) -> &Payload<SensorRecord> {
        &self.sensor_record
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_transaction_id(&self) -> &str {
        self.transaction_id.as_str()
    }

    pub fn get_status(&self) -> Status {
        self.status
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settlement::AlwaysRelease;

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::generate_genesis_block(1_700_000_000_000);
        assert!(genesis.is_genesis());
        assert_eq!(genesis.get_previous_hash(), "0");
        assert_eq!(genesis.get_status(), Status::Released);
        assert!(genesis.get_contract_record().record().is_none());
        assert!(genesis.is_self_consistent());
        assert_eq!(
            genesis.get_hash(),
            "e6c7f67927e3bfc14794c570398f05dea2323888fe4bb3b846550aa9bb9bba5d"
        );
    }

    #[test]
    fn test_block_json_shape() {
        let block = Block::new_block(
            1,
            1_700_000_000_000,
            "abc".to_string(),
            ContractRecord::new("C1", "A1", "Bricks", "100"),
            SensorRecord::new("12", "0.85", "30"),
            &AlwaysRelease,
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["contract_record"]["work"], "Bricks");
        assert_eq!(value["sensor_record"]["ultrasonic"], "0.85");
        assert_eq!(value["status"], "RELEASED");
        assert_eq!(value["previous_hash"], "abc");

        let genesis = serde_json::to_value(Block::generate_genesis_block(1)).unwrap();
        assert_eq!(genesis["contract_record"], "Genesis");
    }

    #[test]
    fn test_json_round_trip_preserves_hash() {
        let block = Block::new_block(
            3,
            1_700_000_000_123,
            "prev".to_string(),
            ContractRecord::new("C9", "Z", "Steel", "30"),
            SensorRecord::new("16", "0.92", "33"),
            &AlwaysRelease,
        );
        let json = serde_json::to_string(&block).unwrap();
        let restored: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, block);
        assert!(restored.is_self_consistent());

        let genesis = Block::generate_genesis_block(5);
        let restored: Block =
            serde_json::from_str(&serde_json::to_string(&genesis).unwrap()).unwrap();
        assert_eq!(restored.get_hash(), restored.calculate_hash());
    }
}
