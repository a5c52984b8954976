//! Venue adapters: one uniform internal surface over five venue protocols.
//!
//! Each venue module declares the external pool trait (the typed interface
//! the deployed venue contract presents) plus adapter routines that normalize
//! the three differences between venues:
//!
//! 1. **value model**; Cetus and FlowX traffic in raw [`Balance`] values,
//!    Turbos/DeepBook/Aftermath in wrapping [`Coin`]s; adapters convert at
//!    the boundary so compositions route balances throughout,
//! 2. **receipt shape**; self-describing (Cetus), opaque (Turbos, FlowX),
//!    hot-potato loan (DeepBook); adapters wrap each into a scoped receipt
//!    whose drop path panics unless settled or dissolved,
//! 3. **remainder handling**; zero-valued dust is destroyed, anything else
//!    goes back to the sender.
//!
//! CLMM swaps are issued with the extreme price-limit constants so a swap may
//! traverse its full tick range; the profit assertion, not slippage, is the
//! correctness guard.

pub mod aftermath;
pub mod cetus;
pub mod deepbook;
pub mod flowx;
pub mod turbos;

use crate::asset::Asset;
use crate::coin::Coin;
use crate::context::TxContext;
use crate::error::EngineError;

/// Lowest sqrt price a downward (a→b) CLMM swap may reach.
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;
/// Highest sqrt price an upward (b→a) CLMM swap may reach.
pub const MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_055;

/// Armed guard inside every flash receipt. Dropping one that was neither
/// settled nor dissolved means a composition leaked a live debt; on chain
/// the transaction could not have committed, so in this rendering it panics.
#[derive(Debug)]
pub(crate) struct DebtGuard {
    defused: bool,
}

impl DebtGuard {
    pub(crate) fn armed() -> Self {
        Self { defused: false }
    }

    pub(crate) fn defuse(&mut self) {
        self.defused = true;
    }
}

impl Drop for DebtGuard {
    fn drop(&mut self) {
        if !self.defused && !std::thread::panicking() {
            panic!("flash receipt dropped without settlement");
        }
    }
}

/// Common surface of the four receipt shapes, used by entry routines to turn
/// any mid-route failure into a whole-transaction abort.
pub(crate) trait Obligation: Sized {
    /// Consume the receipt on the abort path. On chain this is the implicit
    /// effect of the abort itself; here it defuses the guard so the revert
    /// path does not panic.
    fn dissolve(self);

    /// Ride the receipt across a route leg: on `Err` the receipt is
    /// dissolved and the abort propagates, on `Ok` both travel on.
    fn across<T>(self, leg: Result<T, EngineError>) -> Result<(T, Self), EngineError> {
        match leg {
            Ok(value) => Ok((value, self)),
            Err(abort) => {
                self.dissolve();
                Err(abort)
            }
        }
    }
}

/// Dust rule: destroy zero-valued remainders, send anything else home.
pub(crate) fn sweep<T: Asset>(coin: Coin<T>, ctx: &mut TxContext) -> Result<(), EngineError> {
    if coin.value() == 0 {
        coin.destroy_zero()
    } else {
        ctx.transfer_to_sender(coin);
        Ok(())
    }
}
