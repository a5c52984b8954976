//! Capability and pause switch.
//!
//! `AdminCap` is the authority object: private fields, no `Clone`/`Copy`, and
//! the only mint path is [`deploy`], so holding one is a compile-time witness
//! of authority, not ambient global state. Transfer is a move; losing the
//! capability bricks the entry surface by construction.

use crate::error::EngineError;

/// The authority token. Minted exactly once at deployment and required by
/// every strategy entry and both pause transitions.
#[derive(Debug)]
pub struct AdminCap {
    _seal: (),
}

/// Shared pause flag. When engaged, every strategy entry fails fast before
/// touching any asset.
#[derive(Debug)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseSwitch {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self, _cap: &AdminCap) {
        self.paused = true;
    }

    pub fn unpause(&mut self, _cap: &AdminCap) {
        self.paused = false;
    }
}

/// One-time initialization: mint the capability and the (unpaused) switch.
/// The deployer receives the capability by move.
pub fn deploy() -> (AdminCap, PauseSwitch) {
    (AdminCap { _seal: () }, PauseSwitch { paused: false })
}

/// Entry prologue: abort with `E_PAUSED` while the switch is engaged.
pub fn assert_not_paused(switch: &PauseSwitch) -> Result<(), EngineError> {
    if switch.is_paused() {
        return Err(EngineError::Paused);
    }
    Ok(())
}
