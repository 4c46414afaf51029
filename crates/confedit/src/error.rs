use thiserror::Error;

/// Errors raised by the tree-mutation and lookup API.
///
/// Parse-time failures live in [`crate::parsing::ParseError`]; this enum
/// covers API misuse (tree-invariant violations) and missing lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The block is not attached to a container, so its container-derived
    /// state (e.g. the normalized key of a property) is undefined.
    #[error("the block is not attached to a container yet, insert it first")]
    NotAttached,

    /// A raw multi-line string was passed to the single-line value setter.
    #[error("cannot assign a multi-line value to `{key}` with set_value, use set_values instead")]
    MultilineValue { key: String },

    #[error("section `{name}` already exists")]
    DuplicateSection { name: String },

    #[error("property `{key}` already exists in section `{section}`")]
    DuplicateProperty { section: String, key: String },

    #[error("no section `{name}` found")]
    NoSection { name: String },

    #[error("no property `{key}` found in section `{section}`")]
    NoProperty { section: String, key: String },
}
