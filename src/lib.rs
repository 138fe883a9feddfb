//! ThoughtSpace core: ingestion and classification for a spatial knowledge
//! base organized around three pillars (health, wealth, wisdom).
//!
//! Raw files flow through the pipeline: read -> classify (remote LLM or
//! offline keywords) -> place on the canvas -> commit to the notes store,
//! which rebuilds its category aggregates on every mutation.

pub mod chat;
pub mod classifier;
pub mod layout;
pub mod llm;
pub mod pipeline;
pub mod settings;
pub mod store;
pub mod taxonomy;
pub mod utils;

pub use classifier::Classification;
pub use pipeline::{UploadQueue, UploadStatus};
pub use settings::SettingsStore;
pub use store::{Note, NotesStore};
pub use taxonomy::Pillar;
