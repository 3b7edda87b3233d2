//! Scenario tests for the combat view
//!
//! - Menu: option availability, sub-selections, escape, delay, exchange
//! - Rounds: fights played to victory, defeat and retreat
//! - Monsters: advancing, infiltrating, waiting, spell reveals
//! - Properties: invariants checked at every step of a fight

pub mod menu;
pub mod monsters;
pub mod properties;
