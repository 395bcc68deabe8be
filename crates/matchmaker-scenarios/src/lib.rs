//! Integration scenarios for the matchmaker application.
//!
//! Wires the scenario harness to the matchmaker remote-call surface:
//! typed wire payloads, a stand-in application handler, and the scripted
//! scenarios themselves.

pub mod api;
pub mod scenarios;
pub mod stub;

pub use scenarios::register_scenarios;
pub use stub::MatchmakerStub;
