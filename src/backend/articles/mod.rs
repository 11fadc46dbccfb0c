//! Articles Module
//!
//! Titled content inside a blog collection, addressed by
//! `(collection_id, slug)`, plus the public feed and share counters.
//!
//! # Module Structure
//!
//! ```text
//! articles/
//! ├── mod.rs         - Module exports and documentation
//! ├── validation.rs  - Title/content rules and feed search patterns
//! ├── handlers.rs    - CRUD, feed and share handlers under /api/blogs
//! └── legacy.rs      - Redirect/gone answers for pre-collection article ids
//! ```

/// Input rules
pub mod validation;

/// HTTP handlers
pub mod handlers;

/// Retired single-id lookup
pub mod legacy;

pub use handlers::{
    create_article, delete_article, get_article, list_articles, share_article, update_article,
};
pub use legacy::legacy_article;
