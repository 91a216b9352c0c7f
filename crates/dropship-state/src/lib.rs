//! dropship-state — deployment history for dropship users.
//!
//! Backed by [redb](https://docs.rs/redb). Records are JSON-serialized into
//! `&[u8]` value columns under `{user_id}/{deployment_id}` keys, so a user's
//! history is a prefix scan.
//!
//! The `HistoryStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across request handlers.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::HistoryStore;
pub use types::*;
