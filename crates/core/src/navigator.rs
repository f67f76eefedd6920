//! Drill-down navigation over the body-site taxonomy.
//!
//! [`BodySiteNavigator`] walks a [`Taxonomy`] one level at a time. It offers the nodes at the
//! current depth, descends when a branch is selected and resolves when a leaf is selected.
//!
//! The only durable navigation state is `history`, the branches entered from the root. The
//! offered view is always the children of the last history entry (or the root forest), and
//! [`BodySiteNavigator::back`] recomputes it by replaying the shortened history through
//! [`Taxonomy::children_of`] rather than restoring a saved view.
//!
//! States:
//! - `Browsing`: no resolved site, `select`/`back` move through the tree.
//! - `Resolved`: a leaf was chosen. `select` and `back` are ignored until `reset`.

use body_sites::{Branch, Leaf, NodeKind, SiteCode, Taxonomy, TaxonomyNode};
use serde::Serialize;

use crate::error::NavigationError;

/// A resolved body site: the leaf's code and display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteSelection {
    code: SiteCode,
    label: String,
}

impl SiteSelection {
    pub fn code(&self) -> SiteCode {
        self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The `(code, label)` pair in the string form stored on incident records.
    pub fn to_pair(&self) -> (String, String) {
        (self.code.to_string(), self.label.clone())
    }
}

impl From<&Leaf> for SiteSelection {
    fn from(leaf: &Leaf) -> Self {
        Self {
            code: leaf.code(),
            label: leaf.label().to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NavigatorState {
    Browsing,
    Resolved,
}

/// Result of a [`BodySiteNavigator::select`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// A branch was entered.
    Descended,
    /// A leaf was chosen.
    Resolved(SiteSelection),
    /// Nothing changed: the navigator was already resolved.
    Ignored,
}

/// One offered node, as shown to a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<SiteCode>,
}

impl From<&TaxonomyNode> for NodeSummary {
    fn from(node: &TaxonomyNode) -> Self {
        Self {
            id: node.id().to_owned(),
            label: node.label().to_owned(),
            kind: node.kind(),
            code: node.code(),
        }
    }
}

/// Owned, serialisable copy of the navigator's state.
///
/// `options` is empty while resolved: the drill-down is suspended until reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationSnapshot {
    pub state: NavigatorState,
    pub path: Vec<String>,
    pub breadcrumb: Vec<String>,
    pub options: Vec<NodeSummary>,
    pub resolved: Option<SiteSelection>,
}

/// Stateful walker over a borrowed [`Taxonomy`].
#[derive(Clone, Debug)]
pub struct BodySiteNavigator<'t> {
    taxonomy: &'t Taxonomy,
    history: Vec<&'t Branch>,
    current_view: &'t [TaxonomyNode],
    resolved: Option<SiteSelection>,
    /// Panic on contract violations instead of logging and recovering.
    strict: bool,
}

impl<'t> BodySiteNavigator<'t> {
    /// A navigator at the root of `taxonomy`, nothing resolved.
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self {
            taxonomy,
            history: Vec::new(),
            current_view: taxonomy.roots(),
            resolved: None,
            strict: cfg!(debug_assertions),
        }
    }

    /// A navigator for a record that may already hold a site code.
    ///
    /// A code naming a leaf starts the navigator resolved with that leaf's label. A missing or
    /// empty code starts at the root. An unparseable code, or one no leaf carries (for example
    /// a retired code on an old record), also starts at the root rather than failing.
    pub fn with_selected_code(taxonomy: &'t Taxonomy, selected_code: Option<&str>) -> Self {
        let mut navigator = Self::new(taxonomy);

        let Some(raw) = selected_code.map(str::trim).filter(|c| !c.is_empty()) else {
            return navigator;
        };

        match SiteCode::parse(raw) {
            Ok(code) => match taxonomy.find_leaf(code) {
                Some(leaf) => navigator.resolved = Some(SiteSelection::from(leaf)),
                None => tracing::warn!("body-site code {} not in taxonomy; starting at root", code),
            },
            Err(e) => tracing::warn!("ignoring stored body-site code: {}", e),
        }

        navigator
    }

    pub fn taxonomy(&self) -> &'t Taxonomy {
        self.taxonomy
    }

    pub fn state(&self) -> NavigatorState {
        if self.resolved.is_some() {
            NavigatorState::Resolved
        } else {
            NavigatorState::Browsing
        }
    }

    /// Branches entered so far, root first.
    pub fn history(&self) -> &[&'t Branch] {
        &self.history
    }

    /// Nodes offered at the current depth.
    pub fn current_view(&self) -> &'t [TaxonomyNode] {
        self.current_view
    }

    pub fn resolved(&self) -> Option<&SiteSelection> {
        self.resolved.as_ref()
    }

    /// Ids of the history branches, usable with [`Taxonomy::children_of`].
    pub fn path_ids(&self) -> Vec<&'t str> {
        self.history.iter().map(|branch| branch.id()).collect()
    }

    /// Labels of the history branches, e.g. `["Hands & Fingers", "Right Hand"]`.
    pub fn breadcrumb(&self) -> Vec<&'t str> {
        self.history.iter().map(|branch| branch.label()).collect()
    }

    /// Select a node from [`current_view`](Self::current_view).
    ///
    /// The node must be one of the offered nodes (compared by identity). Passing any other
    /// node is a caller bug: it panics in debug builds and is logged and ignored otherwise.
    pub fn select(&mut self, node: &'t TaxonomyNode) -> SelectOutcome {
        if self.resolved.is_some() {
            tracing::debug!("select '{}' ignored: site already resolved", node.id());
            return SelectOutcome::Ignored;
        }

        if !self.offers(node) {
            self.contract_violation(&format!(
                "selected node '{}' is not in the current view",
                node.id()
            ));
            return SelectOutcome::Ignored;
        }

        match node {
            TaxonomyNode::Branch(branch) => {
                self.history.push(branch);
                self.current_view = branch.children();
                tracing::debug!("entered body-site region '{}'", branch.id());
                SelectOutcome::Descended
            }
            TaxonomyNode::Leaf(leaf) => {
                let selection = SiteSelection::from(leaf);
                tracing::debug!("resolved body site {} ({})", leaf.code(), leaf.label());
                self.resolved = Some(selection.clone());
                SelectOutcome::Resolved(selection)
            }
        }
    }

    /// Select the offered node with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotOffered`] if no node in the current view has that id.
    pub fn select_id(&mut self, id: &str) -> Result<SelectOutcome, NavigationError> {
        if self.resolved.is_some() {
            return Ok(SelectOutcome::Ignored);
        }

        let view = self.current_view;
        let node = view
            .iter()
            .find(|node| node.id() == id)
            .ok_or_else(|| NavigationError::NotOffered(id.to_owned()))?;
        Ok(self.select(node))
    }

    /// Go up one level.
    ///
    /// Returns `false` without changing anything when resolved or already at the root.
    pub fn back(&mut self) -> bool {
        if self.resolved.is_some() || self.history.is_empty() {
            return false;
        }

        self.history.pop();
        self.current_view = self.replay_history();
        true
    }

    /// Return to the root with nothing resolved.
    pub fn reset(&mut self) {
        let strict = self.strict;
        *self = Self::new(self.taxonomy);
        self.strict = strict;
    }

    /// Owned copy of the current state for rendering or serialisation.
    pub fn snapshot(&self) -> NavigationSnapshot {
        let options = if self.resolved.is_some() {
            Vec::new()
        } else {
            self.current_view.iter().map(NodeSummary::from).collect()
        };

        NavigationSnapshot {
            state: self.state(),
            path: self.path_ids().into_iter().map(str::to_owned).collect(),
            breadcrumb: self.breadcrumb().into_iter().map(str::to_owned).collect(),
            options,
            resolved: self.resolved.clone(),
        }
    }

    fn offers(&self, node: &TaxonomyNode) -> bool {
        self.current_view
            .iter()
            .any(|offered| std::ptr::eq(offered, node))
    }

    fn replay_history(&mut self) -> &'t [TaxonomyNode] {
        let taxonomy = self.taxonomy;
        match taxonomy.children_of(&self.path_ids()) {
            Ok(view) => view,
            Err(e) => {
                self.contract_violation(&format!("history no longer resolves: {e}"));
                self.history.clear();
                taxonomy.roots()
            }
        }
    }

    fn contract_violation(&self, detail: &str) {
        tracing::error!("body-site navigator contract violation: {}", detail);
        if self.strict {
            panic!("body-site navigator contract violation: {detail}");
        }
    }

    #[cfg(test)]
    fn recovering(mut self) -> Self {
        self.strict = false;
        self
    }
}
