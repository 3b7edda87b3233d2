//! skirmish - turn-based combat view core
//!
//! The combat screen of a classic party-based RPG: a party of characters
//! against an encounter of monsters, played out as a mode state machine
//! with timed text reveals on a 40x25 text canvas.
//!
//! - `combat`: dice, monsters, damage, spells and the combat session
//! - `party`: characters and their conditions
//! - `ui`: collaborator interfaces (canvas, strings, input, events, audio)
//! - `timers`: the single-slot delay scheduler
//! - `driver`: async loop feeding keys and ticks into a session
//! - `config`: layered configuration and data file loading

pub mod combat;
pub mod config;
pub mod driver;
pub mod party;
pub mod timers;
pub mod ui;

pub use combat::{CombatOutcome, CombatSession, Encounter, Monster};
pub use config::Config;
pub use driver::CombatDriver;
pub use party::{Character, Party};
