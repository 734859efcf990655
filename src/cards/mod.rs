//! Card system: definitions, instances, and catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardKind` / `CardCategory`: Government vs special, and placement category
//! - `CardDefinition`: Immutable card data
//! - `CardInstance`: A compact, copyable card inside a built deck
//! - `CardCatalog`: Definition lookup by id or name

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod standard;

pub use catalog::CardCatalog;
pub use definition::{CardCategory, CardDefinition, CardId, CardKind};
pub use instance::CardInstance;
pub use standard::{standard_catalog, FILLER_CARD};
