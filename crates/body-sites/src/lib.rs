//! Anatomical body-site taxonomy.
//!
//! This crate holds the classification forest used to code injury locations on IPC incident
//! forms (for example needlestick injuries):
//! - a strict YAML wire format for the taxonomy data asset
//! - translation from the wire format into a validated domain model
//! - read-only lookups (`children_of`, leaf search by code)
//!
//! The forest is pure data. Drill-down state lives in `ipc-core`, and display concerns such as
//! icons are keyed by node id in the host layer, never stored here.

pub mod node;
pub mod taxonomy;
mod wire;

pub use node::{Branch, Leaf, NodeKind, SiteCode, TaxonomyNode};
pub use taxonomy::{Leaves, Taxonomy, BUILTIN_TAXONOMY_YAML};

/// Errors returned by the `body-sites` crate.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("node at {path} has both a code and children")]
    AmbiguousNode { path: String },

    #[error("node at {path} has neither a code nor children")]
    IncompleteNode { path: String },

    #[error("branch at {path} has no children")]
    EmptyBranch { path: String },

    #[error("taxonomy has no root nodes")]
    EmptyTaxonomy,

    #[error("taxonomy exceeds maximum nesting depth of {max} at {path}")]
    TooDeep { path: String, max: usize },

    #[error("invalid text at {path}: {source}")]
    InvalidText {
        path: String,
        #[source]
        source: ipc_types::TextError,
    },

    #[error("site code must be a positive integer: {0}")]
    InvalidCode(String),

    #[error("duplicate sibling id '{id}' under {parent}")]
    DuplicateSiblingId { parent: String, id: String },

    #[error("site code {code} is used by both {first} and {second}")]
    DuplicateCode {
        code: SiteCode,
        first: String,
        second: String,
    },

    #[error("no branch matches path {0:?}")]
    UnknownPath(Vec<String>),

    #[error("built-in taxonomy is invalid: {0}")]
    Builtin(String),
}

/// Type alias for Results that can fail with a [`TaxonomyError`].
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
