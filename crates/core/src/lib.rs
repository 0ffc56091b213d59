//! Domain logic for the translation-project marketplace.
//!
//! This crate is free of I/O: persistence, mail, and object storage are
//! reached through the collaborator traits in [`allocator`], so the project
//! lifecycle and allocation rules can be exercised without a database.

pub mod allocator;
pub mod capability;
pub mod error;
pub mod language;
pub mod state;
pub mod types;
