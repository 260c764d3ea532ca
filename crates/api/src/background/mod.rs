//! Long-running background tasks spawned from `main`.

pub mod draft_expiry;
