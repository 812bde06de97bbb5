//! HNSW graph index for proxima
//!
//! Build-once, query-many approximate nearest-neighbor search:
//!
//! - **HnswIndex**: multi-layer proximity graph over an arena of
//!   embeddings (insert on the build side, layered beam search on the
//!   query side)
//! - **Snapshot codec**: binary persistence of the graph plus a JSON
//!   [`OrderTable`] mapping item ids back to external keys
//! - **Corpus**: the `{ dims, vectors }` input format consumed at build
//!   time
//! - **AnnStore**: facade tying vectorizer, graph, and order table
//!   together for text queries
//!
//! A built or loaded index is immutable; queries take `&self` and are
//! safe to run concurrently from any number of threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod corpus;
pub mod graph;
mod insert;
pub mod order;
mod search;
pub mod snapshot;
pub mod store;
mod visited;

pub use corpus::Corpus;
pub use graph::HnswIndex;
pub use order::OrderTable;
pub use snapshot::SNAPSHOT_VERSION;
pub use store::{AnnStore, Match};
