//! # Document tree
//!
//! The in-memory model of a configuration file. Every node owns the raw
//! source lines it was parsed from ([`RawLines`]) plus a `modified` flag that
//! decides between verbatim and synthesized rendering.
//!
//! ## Ownership
//!
//! Children are owned by value inside their parent's list; heterogeneous
//! siblings are tagged enums ([`ConfigContent`], [`SectionContent`]) rather
//! than trait objects. Inserting a node consumes it, so the same node can
//! never be reachable from two trees; removal returns the owned node for
//! reuse elsewhere. Deep copy is `Clone`.
//!
//! ## Modules
//!
//! - **`raw`**: [`RawLines`] fragment store shared by every node kind
//! - **`container`**: [`Container`] ordered sibling-list behavior
//! - **`trivia`**: [`Comment`] and [`Space`] leaf nodes
//! - **`property`**: [`Property`] key/value blocks with multi-line values
//! - **`section`**: [`Section`] named containers of properties
//! - **`document`**: [`Document`] root container of sections
//! - **`builder`**: fluent positional insertion helpers

pub mod builder;
pub mod container;
pub mod document;
pub mod property;
pub mod raw;
pub mod section;
pub mod trivia;

pub use builder::{DocumentBuilder, SectionBuilder};
pub use container::Container;
pub use document::{ConfigContent, Document};
pub use property::Property;
pub use raw::RawLines;
pub use section::{Section, SectionContent};
pub use trivia::{Comment, Space};
