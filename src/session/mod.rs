//! Interactive session management module
//!
//! Connects the UI to the upstream fetchers: fetch requests come in over the
//! action channel, run as cancellable tasks, and their results are sent back
//! tagged with the generation that issued them.

pub mod action_channel;
pub mod generation;
pub mod session_manager;

pub use action_channel::{ActionChannel, CoinPayload, FetchKind, FetchRequest, SessionEvent};
pub use generation::{Generation, GenerationTracker};
pub use session_manager::{Fetchers, SessionManager, SessionState, SessionStats};
