//! Transaction context: sender identity, emitted events, outgoing transfers.
//!
//! Entries never return assets or receipts; everything leaving a composition
//! flows through the context, which is what lets tests assert "no assets
//! move" on the abort paths.

use crate::asset::Asset;
use crate::coin::Coin;
use crate::event::ArbExecuted;

/// On-chain wall clock handle, passed into every entry.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    timestamp_ms: u64,
}

impl Clock {
    pub fn new(timestamp_ms: u64) -> Self {
        Self { timestamp_ms }
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

/// An asset amount credited to the sender by a completed composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    pub asset: &'static str,
    pub amount: u64,
}

/// Per-transaction context collecting emissions and transfers.
#[derive(Debug)]
pub struct TxContext {
    sender: String,
    events: Vec<ArbExecuted>,
    credits: Vec<Credit>,
}

impl TxContext {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            events: Vec::new(),
            credits: Vec::new(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn emit(&mut self, event: ArbExecuted) {
        self.events.push(event);
    }

    /// Transfer a coin to the transaction sender.
    pub fn transfer_to_sender<T: Asset>(&mut self, coin: Coin<T>) {
        self.credits.push(Credit {
            asset: T::TYPE_NAME,
            amount: coin.value(),
        });
        // The coin's value now lives in the credit ledger.
        drop(coin.into_balance());
    }

    pub fn events(&self) -> &[ArbExecuted] {
        &self.events
    }

    pub fn credits(&self) -> &[Credit] {
        &self.credits
    }
}
