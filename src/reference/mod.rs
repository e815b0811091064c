//! Reference data abstraction
//!
//! Provides the trait and an in-memory implementation for looking up
//! reference genome bases.

pub mod memory;
pub mod provider;

pub use memory::InMemoryGenome;
pub use provider::RefGenome;
