//! Storage Adapters
//!
//! Implementations of the BatchStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryBatchStore** - Keeps processed batches in memory for the life of the process
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryBatchStore;
//!
//! let store = InMemoryBatchStore::new();
//! store.save(&batch).await?;
//! ```

mod in_memory_batch_store;

pub use in_memory_batch_store::InMemoryBatchStore;
