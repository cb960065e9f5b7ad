// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod ledger;
pub mod persist;
pub mod phase;
pub mod progress;
pub mod scoring;
pub mod store;
pub mod streak;
pub mod zones;
