//! The profit invariant.
//!
//! The sole correctness guard on every composition: swaps run with slippage
//! limits disabled, so this check; executed after the final swap, before any
//! repayment; is what makes an unprofitable route abort while the receipt is
//! still unconsumed, reverting the whole transaction.

use crate::error::EngineError;

/// Require `amount_out ≥ amount_in` and `amount_out − amount_in ≥ min_profit`.
///
/// The subtraction order matters: `amount_in + min_profit` can overflow u64,
/// the checked difference cannot.
pub fn assert_profit(amount_out: u64, amount_in: u64, min_profit: u64) -> Result<(), EngineError> {
    if amount_out < amount_in {
        return Err(EngineError::NotProfitable);
    }
    if amount_out - amount_in < min_profit {
        return Err(EngineError::NotProfitable);
    }
    Ok(())
}
