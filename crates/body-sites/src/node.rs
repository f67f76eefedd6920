//! Taxonomy node model.
//!
//! A node is either a [`Branch`] (a region that can be drilled into) or a [`Leaf`] (a terminal,
//! selectable site carrying a [`SiteCode`]). The leaf-or-branch rule is carried by the type, so
//! a node can never hold both a code and children.

use crate::{TaxonomyError, TaxonomyResult};
use ipc_types::{Identifier, NonEmptyText};
use serde::Serialize;
use std::num::NonZeroU32;

/// Standardised injury-site code carried by a leaf.
///
/// Codes are positive and unique across a taxonomy. Incident records store the decimal form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SiteCode(NonZeroU32);

impl SiteCode {
    /// Creates a code from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidCode`] for zero.
    pub fn new(value: u32) -> TaxonomyResult<Self> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| TaxonomyError::InvalidCode(value.to_string()))
    }

    /// Parses the decimal form stored on incident records, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::InvalidCode`] for empty, zero, signed or non-numeric input.
    pub fn parse(input: &str) -> TaxonomyResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TaxonomyError::InvalidCode(trimmed.to_owned()));
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| TaxonomyError::InvalidCode(trimmed.to_owned()))?;
        Self::new(value)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for SiteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SiteCode {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether a node can be drilled into or selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Branch,
    Leaf,
}

/// A region with a non-empty, ordered list of children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub(crate) id: Identifier,
    pub(crate) label: NonEmptyText,
    pub(crate) children: Vec<TaxonomyNode>,
}

impl Branch {
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Child nodes in declaration order. Never empty.
    pub fn children(&self) -> &[TaxonomyNode] {
        &self.children
    }
}

/// A terminal, selectable site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub(crate) id: Identifier,
    pub(crate) label: NonEmptyText,
    pub(crate) code: SiteCode,
}

impl Leaf {
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn code(&self) -> SiteCode {
        self.code
    }
}

/// A node in the body-site forest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaxonomyNode {
    Branch(Branch),
    Leaf(Leaf),
}

impl TaxonomyNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Branch(branch) => branch.id(),
            Self::Leaf(leaf) => leaf.id(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Branch(branch) => branch.label(),
            Self::Leaf(leaf) => leaf.label(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Branch(_) => NodeKind::Branch,
            Self::Leaf(_) => NodeKind::Leaf,
        }
    }

    /// The leaf's code, or `None` for a branch.
    pub fn code(&self) -> Option<SiteCode> {
        self.as_leaf().map(Leaf::code)
    }

    /// The branch's children, or `None` for a leaf.
    pub fn children(&self) -> Option<&[TaxonomyNode]> {
        self.as_branch().map(Branch::children)
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(branch) => Some(branch),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Branch(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}
