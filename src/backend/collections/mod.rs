//! Blog Collections Module
//!
//! Named, owned groupings of articles, each bound to a unique subdomain.
//!
//! # Module Structure
//!
//! ```text
//! collections/
//! ├── mod.rs         - Module exports and documentation
//! ├── validation.rs  - Create/update input rules
//! └── handlers.rs    - HTTP handlers for /api/blog-collections
//! ```
//!
//! # Identifiers
//!
//! - `slug` is `slugify(name)` plus a random suffix and is regenerated when
//!   the collection is renamed.
//! - `subdomain` is explicit or derived from the name at creation and never
//!   changes afterwards. A taken subdomain is a 409.

/// Create/update input rules
pub mod validation;

/// HTTP handlers
pub mod handlers;

pub use handlers::{
    create_collection, delete_collection, get_collection, get_collection_by_subdomain,
    list_collections, my_collections, update_collection,
};
