//! Storage layer for the roster registry.
//!
//! Records live in named collections ("skills", "agents", ...) keyed by id.
//! Higher layers only talk to the [`Storage`] trait; [`MemoryStorage`] is the
//! volatile, single-process backend.

pub mod error;
pub mod memory;
pub mod store;

pub use {
    error::{Error, Result},
    memory::MemoryStorage,
    store::{Storage, StorageHealth},
};
