//! Integration tests for tokio_health
//!
//! Each test starts an in-process probe server on an ephemeral port and talks
//! to it over real HTTP.
//!
//! Run with: cargo test --test integration

mod helpers;

mod bundled_probes;
mod probe_endpoints;
