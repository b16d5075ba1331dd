use crate::core::Status;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Snapshot of the simulated payment account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: f64,
    pub gas_spent: f64,
    pub transaction_count: u64,
}

/// Owns the wallet and the fee rule applied on every commit
#[derive(Debug, Clone)]
pub struct WalletLedger {
    wallet: Wallet,
    release_fee: f64,
}

impl WalletLedger {
    pub fn new(initial_balance: f64, release_fee: f64) -> Self {
        WalletLedger {
            wallet: Wallet {
                balance: initial_balance,
                gas_spent: 0.0,
                transaction_count: 0,
            },
            release_fee,
        }
    }

    /// Record one appended block. RELEASED pays the release fee plus gas;
    /// LOCKED only counts the transaction and its gas. The balance may go
    /// negative.
    pub fn on_commit(&mut self, status: Status, gas: f64) {
        let gas = if gas.is_finite() {
            gas
        } else {
            warn!("Non-finite gas value {gas}, counting it as 0");
            0.0
        };

        self.wallet.transaction_count += 1;
        self.wallet.gas_spent += gas;

        if status == Status::Released {
            self.wallet.balance -= self.release_fee + gas;
            info!(
                "Released payment: fee {} + gas {gas}, balance now {}",
                self.release_fee, self.wallet.balance
            );
        } else {
            info!("Payment locked, balance unchanged at {}", self.wallet.balance);
        }
    }

    pub fn snapshot(&self) -> Wallet {
        self.wallet.clone()
    }
}

/// Parse a numeric string leniently. Empty, malformed or non-finite input
/// becomes 0 and is logged.
pub fn coerce_amount(raw: &str, field: &str) -> f64 {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("Malformed {field} value {raw:?}, using 0");
            0.0
        }
    }
}

/// A numeric field that clients may send either as a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn coerce(&self, field: &str) -> f64 {
        match self {
            Amount::Number(value) if value.is_finite() => *value,
            Amount::Number(value) => {
                warn!("Non-finite {field} value {value}, using 0");
                0.0
            }
            Amount::Text(raw) => coerce_amount(raw, field),
        }
    }
}
