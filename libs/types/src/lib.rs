//! # Kestrel Types - Shared Domain Vocabulary
//!
//! ## Purpose
//!
//! Core types shared by every Kestrel service: venue identities, normalized
//! pool snapshots, arbitrage opportunities and their strategy tags, token
//! decimal metadata, configuration, and the bot-side error taxonomy.
//! Everything here is plain data, with no I/O and no async, so the collector,
//! scanner, and executor agree on a vocabulary without dragging in each
//! other's dependencies.
//!
//! ## Integration Points
//!
//! - **Producers**: the collector writes [`PoolSnapshot`]s, the scanner
//!   creates [`Opportunity`]s, `main` loads [`Config`]
//! - **Consumers**: every service crate in the workspace
//! - **Invariants owned here**: snapshot staleness accounting, strategy-tag →
//!   entry-function mapping, decimal normalization factors

pub mod config;
pub mod decimals;
pub mod error;
pub mod opportunity;
pub mod pool;

pub use config::{Config, PoolConfig};
pub use decimals::DecimalsMap;
pub use error::BotError;
pub use opportunity::{Opportunity, StrategyTag};
pub use pool::{PoolSnapshot, Venue};
