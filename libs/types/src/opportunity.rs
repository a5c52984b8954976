//! Arbitrage opportunities and the fixed set of on-chain strategy variants.

use crate::pool::Venue;
use serde::{Deserialize, Serialize};

/// One of the 27 atomic composition variants published on-chain:
/// 17 two-hop (flash venue → sell venue, including two inverted-pair
/// variants) and 10 tri-hop cycle templates.
///
/// The tag fixes the leg template: which venue provides the flash borrow,
/// which venues host the remaining swaps, and how many pool handles the entry
/// expects. The concrete assets come from the call's type arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyTag {
    // ── Two-hop ──
    CetusToTurbos,
    CetusToTurbosRev,
    TurbosToCetus,
    CetusToDeepBook,
    DeepBookToCetus,
    TurbosToDeepBook,
    DeepBookToTurbos,
    CetusToAftermath,
    CetusToAftermathRev,
    TurbosToAftermath,
    DeepBookToAftermath,
    CetusToFlowxClmm,
    FlowxClmmToCetus,
    TurbosToFlowxClmm,
    FlowxClmmToTurbos,
    DeepBookToFlowxClmm,
    FlowxClmmToDeepBook,

    // ── Tri-hop ──
    TriCetusCetusCetus,
    TriCetusCetusTurbos,
    TriCetusTurbosDeepBook,
    TriCetusDeepBookTurbos,
    TriDeepBookCetusTurbos,
    TriCetusCetusAftermath,
    TriCetusTurbosAftermath,
    TriCetusCetusFlowxClmm,
    TriCetusFlowxClmmTurbos,
    TriFlowxClmmCetusTurbos,
}

impl StrategyTag {
    /// Every variant, in declaration order.
    pub const ALL: [StrategyTag; 27] = [
        StrategyTag::CetusToTurbos,
        StrategyTag::CetusToTurbosRev,
        StrategyTag::TurbosToCetus,
        StrategyTag::CetusToDeepBook,
        StrategyTag::DeepBookToCetus,
        StrategyTag::TurbosToDeepBook,
        StrategyTag::DeepBookToTurbos,
        StrategyTag::CetusToAftermath,
        StrategyTag::CetusToAftermathRev,
        StrategyTag::TurbosToAftermath,
        StrategyTag::DeepBookToAftermath,
        StrategyTag::CetusToFlowxClmm,
        StrategyTag::FlowxClmmToCetus,
        StrategyTag::TurbosToFlowxClmm,
        StrategyTag::FlowxClmmToTurbos,
        StrategyTag::DeepBookToFlowxClmm,
        StrategyTag::FlowxClmmToDeepBook,
        StrategyTag::TriCetusCetusCetus,
        StrategyTag::TriCetusCetusTurbos,
        StrategyTag::TriCetusTurbosDeepBook,
        StrategyTag::TriCetusDeepBookTurbos,
        StrategyTag::TriDeepBookCetusTurbos,
        StrategyTag::TriCetusCetusAftermath,
        StrategyTag::TriCetusTurbosAftermath,
        StrategyTag::TriCetusCetusFlowxClmm,
        StrategyTag::TriCetusFlowxClmmTurbos,
        StrategyTag::TriFlowxClmmCetusTurbos,
    ];

    /// Entry function name inside the published package.
    pub fn entry_function(&self) -> &'static str {
        match self {
            Self::CetusToTurbos => "arb_cetus_to_turbos",
            Self::CetusToTurbosRev => "arb_cetus_to_turbos_reverse",
            Self::TurbosToCetus => "arb_turbos_to_cetus",
            Self::CetusToDeepBook => "arb_cetus_to_deepbook",
            Self::DeepBookToCetus => "arb_deepbook_to_cetus",
            Self::TurbosToDeepBook => "arb_turbos_to_deepbook",
            Self::DeepBookToTurbos => "arb_deepbook_to_turbos",
            Self::CetusToAftermath => "arb_cetus_to_aftermath",
            Self::CetusToAftermathRev => "arb_cetus_to_aftermath_rev",
            Self::TurbosToAftermath => "arb_turbos_to_aftermath",
            Self::DeepBookToAftermath => "arb_deepbook_to_aftermath",
            Self::CetusToFlowxClmm => "arb_cetus_to_flowx_clmm",
            Self::FlowxClmmToCetus => "arb_flowx_clmm_to_cetus",
            Self::TurbosToFlowxClmm => "arb_turbos_to_flowx_clmm",
            Self::FlowxClmmToTurbos => "arb_flowx_clmm_to_turbos",
            Self::DeepBookToFlowxClmm => "arb_deepbook_to_flowx_clmm",
            Self::FlowxClmmToDeepBook => "arb_flowx_clmm_to_deepbook",
            Self::TriCetusCetusCetus => "tri_cetus_cetus_cetus",
            Self::TriCetusCetusTurbos => "tri_cetus_cetus_turbos",
            Self::TriCetusTurbosDeepBook => "tri_cetus_turbos_deepbook",
            Self::TriCetusDeepBookTurbos => "tri_cetus_deepbook_turbos",
            Self::TriDeepBookCetusTurbos => "tri_deepbook_cetus_turbos",
            Self::TriCetusCetusAftermath => "tri_cetus_cetus_aftermath",
            Self::TriCetusTurbosAftermath => "tri_cetus_turbos_aftermath",
            Self::TriCetusCetusFlowxClmm => "tri_cetus_cetus_flowx_clmm",
            Self::TriCetusFlowxClmmTurbos => "tri_cetus_flowx_clmm_turbos",
            Self::TriFlowxClmmCetusTurbos => "tri_flowx_clmm_cetus_turbos",
        }
    }

    /// Module within the published package that holds the entry.
    pub fn module(&self) -> &'static str {
        if self.is_tri_hop() {
            "tri_hop"
        } else {
            "two_hop"
        }
    }

    pub fn is_tri_hop(&self) -> bool {
        matches!(
            self,
            Self::TriCetusCetusCetus
                | Self::TriCetusCetusTurbos
                | Self::TriCetusTurbosDeepBook
                | Self::TriCetusDeepBookTurbos
                | Self::TriDeepBookCetusTurbos
                | Self::TriCetusCetusAftermath
                | Self::TriCetusTurbosAftermath
                | Self::TriCetusCetusFlowxClmm
                | Self::TriCetusFlowxClmmTurbos
                | Self::TriFlowxClmmCetusTurbos
        )
    }

    /// How many pool handles the entry expects.
    pub fn pool_count(&self) -> usize {
        if self.is_tri_hop() {
            3
        } else {
            2
        }
    }

    /// Which venue provides the flash borrow (the source-of-liquidity leg).
    pub fn flash_source(&self) -> Venue {
        match self {
            Self::CetusToTurbos
            | Self::CetusToTurbosRev
            | Self::CetusToDeepBook
            | Self::CetusToAftermath
            | Self::CetusToAftermathRev
            | Self::CetusToFlowxClmm
            | Self::TriCetusCetusCetus
            | Self::TriCetusCetusTurbos
            | Self::TriCetusTurbosDeepBook
            | Self::TriCetusDeepBookTurbos
            | Self::TriCetusCetusAftermath
            | Self::TriCetusTurbosAftermath
            | Self::TriCetusCetusFlowxClmm
            | Self::TriCetusFlowxClmmTurbos => Venue::Cetus,

            Self::TurbosToCetus
            | Self::TurbosToDeepBook
            | Self::TurbosToAftermath
            | Self::TurbosToFlowxClmm => Venue::Turbos,

            Self::DeepBookToCetus
            | Self::DeepBookToTurbos
            | Self::DeepBookToAftermath
            | Self::DeepBookToFlowxClmm
            | Self::TriDeepBookCetusTurbos => Venue::DeepBook,

            Self::FlowxClmmToCetus
            | Self::FlowxClmmToTurbos
            | Self::FlowxClmmToDeepBook
            | Self::TriFlowxClmmCetusTurbos => Venue::FlowxClmm,
        }
    }

    /// True when any leg of the template touches DeepBook; those entries
    /// additionally require the DEEP fee coin handle.
    pub fn touches_deepbook(&self) -> bool {
        matches!(
            self,
            Self::CetusToDeepBook
                | Self::DeepBookToCetus
                | Self::TurbosToDeepBook
                | Self::DeepBookToTurbos
                | Self::DeepBookToAftermath
                | Self::DeepBookToFlowxClmm
                | Self::FlowxClmmToDeepBook
                | Self::TriCetusTurbosDeepBook
                | Self::TriCetusDeepBookTurbos
                | Self::TriDeepBookCetusTurbos
        )
    }
}

/// A detected, sized, and (eventually) validated arbitrage candidate.
///
/// Created by the scanner with a probe amount; the optimizer refines
/// `amount_in` and the profit estimate; the dry-run pass overwrites
/// `estimated_gas` and `expected_profit` with simulated actuals. The
/// orchestrator discards candidates older than 3 s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub tag: StrategyTag,
    /// Pool object IDs, ordered per the entry's parameter layout
    /// (flash pool first).
    pub pool_ids: Vec<String>,
    /// Coin type arguments for the entry call.
    pub type_args: Vec<String>,
    /// Input amount in the input asset's smallest unit.
    pub amount_in: u64,
    /// Expected gross profit, same unit.
    pub expected_profit: u64,
    /// Estimated gas in MIST.
    pub estimated_gas: u64,
    /// Expected profit minus gas.
    pub net_profit: i64,
    /// Minimum snapshot timestamp across the legs this candidate was
    /// derived from (ms since Unix epoch).
    pub detected_at_ms: u64,
}

impl Opportunity {
    pub fn is_profitable(&self) -> bool {
        self.net_profit > 0
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.detected_at_ms)
    }

    /// Recompute `net_profit` from the current profit and gas estimates.
    pub fn refresh_net(&mut self) {
        self.net_profit = self.expected_profit as i64 - self.estimated_gas as i64;
    }
}
