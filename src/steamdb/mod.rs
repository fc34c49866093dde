//! Steam catalog embedding index
//!
//! Loads the catalog, filters it, embeds each retained record (or reads the
//! cache), and answers top-k semantic queries.

pub mod cache;
pub mod document;
pub mod embedder;
pub mod index;
pub mod manager;
pub mod record;

pub use embedder::{Embedder, OllamaEmbedder};
pub use index::{Neighbor, SimilarityIndex};
pub use manager::SteamDbManager;
pub use record::{GameRecord, POPULARITY_THRESHOLD};
