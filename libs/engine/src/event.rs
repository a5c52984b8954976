//! The execution event emitted by every successful composition.

/// `{strategy, amount_in, profit}`; indexers key on the strategy tag bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbExecuted {
    strategy: &'static str,
    amount_in: u64,
    profit: u64,
}

impl ArbExecuted {
    /// Build the record from the borrowed amount and the total output of the
    /// final swap. The max-guard keeps `profit` from underflowing if a caller
    /// ever records out of order; it is not a substitute for the profit
    /// assertion.
    pub fn record(strategy: &'static str, amount_in: u64, amount_out: u64) -> Self {
        Self {
            strategy,
            amount_in,
            profit: amount_out.saturating_sub(amount_in),
        }
    }

    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// Strategy tag as the byte string carried on the wire.
    pub fn strategy_bytes(&self) -> &'static [u8] {
        self.strategy.as_bytes()
    }

    pub fn amount_in(&self) -> u64 {
        self.amount_in
    }

    pub fn profit(&self) -> u64 {
        self.profit
    }
}
