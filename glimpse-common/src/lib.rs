//! Shared plumbing for the Glimpse crates.
//!
//! Only observability lives here for now: the `tracing` initialiser used by the
//! binary and by integration tests, plus the panic hook that turns request
//! faults into structured log events.
pub mod observability;
