// Re-export main components
pub mod api;
pub mod document;
pub mod engine;
pub mod index;
pub mod loader;
pub mod ranking;
pub mod render;
pub mod tokenizer;
pub mod widget;

// Re-export commonly used types
pub use document::{Field, Post, PublicPost};
pub use engine::SearchContext;
pub use index::{Indexer, InvertedIndex};
pub use loader::{LoadError, PostCollection};
pub use ranking::SearchHit;
pub use render::{JsonRenderer, TerminalRenderer};
pub use tokenizer::Tokenizer;
pub use widget::{Key, Renderer, SearchInput, SearchWidget, TextInput};

// Re-export error types
pub use anyhow::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
