#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use, clippy::doc_markdown)]

//! mdtasks-core: a live, queryable index of checkbox tasks embedded in the
//! markdown notes of a vault.
//!
//! The engine parses task lines ([`task`]), keeps an in-memory index
//! consistent with a weakly-observable document store ([`vault`]), and
//! serializes all document rewrites through a single-worker pipeline. The
//! store itself is abstracted behind a capability trait ([`storage`]); the
//! crate ships a local-filesystem implementation.

pub mod config;
pub mod storage;
pub mod task;
pub mod vault;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
