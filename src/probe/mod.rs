//! Bundled readiness checks.
//!
//! | Check | Fails when |
//! |-------|------------|
//! | [`UrlCheck`] | request cannot be built or sent, or status >= 400 |
//! | [`PingCheck`] | the wrapped [`Pinger`] returns an error |
//!
//! Both are plain [`Check`](crate::Check) implementations without
//! concurrency of their own.

mod ping;
mod url;

pub use ping::{PingCheck, Pinger, TcpPinger};
pub use url::UrlCheck;
