//! Composition Phase
//!
//! Assembles the final document from accepted modules' contributions:
//! guideline fragments resolved through a content store, command
//! suggestions merged into fixed buckets, and marker-delimited sections
//! that regenerate independently.
//!
//! ## Modules
//!
//! - `content`: guideline content stores (embedded packs, directory overrides)
//! - `composer`: Stack/Workflow/Guidelines section bodies
//! - `commands`: the five-bucket command generator
//! - `document`: section markers, rendering, per-section splicing

mod commands;
mod composer;
mod content;
mod document;

pub use commands::CommandGenerator;
pub use composer::GuidelineComposer;
pub use content::{DirStore, EmbeddedStore, GuidelineStore, StoreChain};
pub use document::{ComposedDocument, Section};
