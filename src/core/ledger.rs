// This is the ledger itself - an in-memory, append-only chain of work attestations
// Every append settles the block, links it to the previous hash and charges the wallet
// SharedLedger is the handle that request handlers and sessions pass around

use crate::config::Settings;
use crate::core::block::{Block, ContractRecord, SensorRecord, GENESIS_PREVIOUS_HASH};
use crate::core::settlement::{SettlementPolicy, Status};
use crate::error::{LedgerError, Result};
use crate::utils::current_timestamp;
use crate::wallet::{Amount, Wallet, WalletLedger};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A commit submitted directly, without going through the command interpreter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitRequest {
    pub contract_record: Option<ContractRecord>,
    pub sensor_record: Option<SensorRecord>,
    #[serde(default)]
    pub gas: Option<Amount>,
}

pub struct Ledger {
    blocks: Vec<Block>,
    wallet: WalletLedger,
    policy: Box<dyn SettlementPolicy>,
}

impl Ledger {
    // When I start a ledger from configuration, the policy comes from the settlement mode
    pub fn new(settings: &Settings) -> Result<Ledger> {
        let policy = settings.settlement.mode.build(&settings.settlement);
        Self::with_policy(settings.initial_balance, settings.release_fee, policy)
    }

    pub fn with_policy(
        initial_balance: f64,
        release_fee: f64,
        policy: Box<dyn SettlementPolicy>,
    ) -> Result<Ledger> {
        let genesis = Block::generate_genesis_block(current_timestamp()?);
        info!(
            "Created genesis block {} (settlement policy: {})",
            genesis.get_hash(),
            policy.name()
        );

        Ok(Ledger {
            blocks: vec![genesis],
            wallet: WalletLedger::new(initial_balance, release_fee),
            policy,
        })
    }

    /// Append a block over the given records and charge the wallet.
    /// Nothing is mutated unless the whole block was built.
    pub fn append(
        &mut self,
        contract: ContractRecord,
        sensor: SensorRecord,
        gas: f64,
    ) -> Result<Block> {
        // I link to the hash of whatever block is currently last
        let previous_hash = self
            .blocks
            .last()
            .map(|block| block.get_hash().to_string())
            .ok_or_else(|| {
                LedgerError::UnrecoverableRuntimeFault("Ledger has no genesis block".to_string())
            })?;
        let index = self.blocks.len() as u64;
        let timestamp = current_timestamp()?;

        let block = Block::new_block(
            index,
            timestamp,
            previous_hash,
            contract,
            sensor,
            self.policy.as_ref(),
        );

        self.blocks.push(block.clone());
        self.wallet.on_commit(block.get_status(), gas);

        info!(
            "Appended block {} (tx: {}, status: {})",
            index,
            block.get_transaction_id(),
            block.get_status()
        );
        Ok(block)
    }

    /// Validate a direct commit request before appending it
    pub fn commit(&mut self, request: CommitRequest) -> Result<Block> {
        let contract = request.contract_record.ok_or_else(|| {
            LedgerError::InvalidRequest("contract_record is required".to_string())
        })?;
        let sensor = request.sensor_record.ok_or_else(|| {
            LedgerError::InvalidRequest("sensor_record is required".to_string())
        })?;
        let gas = request.gas.map(|g| g.coerce("gas")).unwrap_or(0.0);

        self.append(contract, sensor, gas)
    }

    /// What the policy would decide for these records, without committing
    pub fn preview(&self, contract: &ContractRecord, sensor: &SensorRecord) -> Status {
        self.policy.settle(contract, sensor)
    }

    /// Full check, including that every stored status is what this
    /// ledger's policy decides for the block's records
    pub fn verify(&self) -> Result<()> {
        verify_chain_with_policy(&self.blocks, self.policy.as_ref())
    }

    pub fn is_valid(&self) -> bool {
        match self.verify() {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    pub fn blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the genesis block is created with the ledger
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    pub fn wallet(&self) -> Wallet {
        self.wallet.snapshot()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

/// Check every block's hash against its own fields and its link to the block
/// before it. Stops at the first bad block.
///
/// Status is not part of the content hash, so this alone cannot catch a
/// rewritten status; use `verify_chain_with_policy` when the policy is known.
pub fn verify_chain(blocks: &[Block]) -> Result<()> {
    verify_blocks(blocks, None)
}

/// `verify_chain`, plus every non-genesis status must equal what `policy`
/// settles for that block's records
pub fn verify_chain_with_policy(blocks: &[Block], policy: &dyn SettlementPolicy) -> Result<()> {
    verify_blocks(blocks, Some(policy))
}

fn verify_blocks(blocks: &[Block], policy: Option<&dyn SettlementPolicy>) -> Result<()> {
    let genesis = blocks
        .first()
        .ok_or_else(|| LedgerError::ChainIntegrityViolation {
            index: 0,
            reason: "chain has no genesis block".to_string(),
        })?;
    if genesis.get_previous_hash() != GENESIS_PREVIOUS_HASH {
        return Err(LedgerError::ChainIntegrityViolation {
            index: 0,
            reason: "genesis previous hash must be \"0\"".to_string(),
        });
    }
    if genesis.get_status() != Status::Released {
        return Err(LedgerError::ChainIntegrityViolation {
            index: 0,
            reason: "genesis status must be RELEASED".to_string(),
        });
    }

    for (position, block) in blocks.iter().enumerate() {
        let position = position as u64;
        if block.get_index() != position {
            return Err(LedgerError::ChainIntegrityViolation {
                index: position,
                reason: format!("block carries index {}", block.get_index()),
            });
        }

        if !block.is_self_consistent() {
            return Err(LedgerError::ChainIntegrityViolation {
                index: position,
                reason: "stored hash does not match block contents".to_string(),
            });
        }

        if position > 0 {
            let previous = &blocks[position as usize - 1];
            if block.get_previous_hash() != previous.get_hash() {
                return Err(LedgerError::ChainIntegrityViolation {
                    index: position,
                    reason: "previous hash does not match the prior block".to_string(),
                });
            }

            if let Some(policy) = policy {
                check_settlement(position, block, policy)?;
            }
        }
    }

    debug!("Verified {} blocks", blocks.len());
    Ok(())
}

fn check_settlement(index: u64, block: &Block, policy: &dyn SettlementPolicy) -> Result<()> {
    let (contract, sensor) = match (
        block.get_contract_record().record(),
        block.get_sensor_record().record(),
    ) {
        (Some(contract), Some(sensor)) => (contract, sensor),
        _ => {
            return Err(LedgerError::ChainIntegrityViolation {
                index,
                reason: "only the genesis block may carry sentinel payloads".to_string(),
            })
        }
    };

    let expected = policy.settle(contract, sensor);
    if block.get_status() != expected {
        return Err(LedgerError::ChainIntegrityViolation {
            index,
            reason: format!(
                "status {} does not match settlement policy {} ({expected})",
                block.get_status(),
                policy.name()
            ),
        });
    }
    Ok(())
}

/// Cloneable handle over one ledger. Appends take the write lock for the
/// whole block construction and wallet update; reads share the read lock.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        SharedLedger {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>> {
        self.inner.read().map_err(|_| {
            LedgerError::UnrecoverableRuntimeFault("Ledger lock poisoned".to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>> {
        self.inner.write().map_err(|_| {
            LedgerError::UnrecoverableRuntimeFault("Ledger lock poisoned".to_string())
        })
    }

    pub fn append(&self, contract: ContractRecord, sensor: SensorRecord, gas: f64) -> Result<Block> {
        self.write()?.append(contract, sensor, gas)
    }

    /// Commit a direct request and return the block with the wallet as it
    /// stood right after this append.
    pub fn commit(&self, request: CommitRequest) -> Result<(Block, Wallet)> {
        let mut ledger = self.write()?;
        let block = ledger.commit(request)?;
        Ok((block, ledger.wallet()))
    }

    pub fn preview(&self, contract: &ContractRecord, sensor: &SensorRecord) -> Result<Status> {
        Ok(self.read()?.preview(contract, sensor))
    }

    pub fn verify(&self) -> Result<()> {
        self.read()?.verify()
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.read()?.is_valid())
    }

    pub fn blocks(&self) -> Result<Vec<Block>> {
        Ok(self.read()?.blocks().to_vec())
    }

    pub fn wallet(&self) -> Result<Wallet> {
        Ok(self.read()?.wallet())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
