//! Host-facing body-site picker.
//!
//! A [`SitePicker`] wraps a [`BodySiteNavigator`] and reports results to the owning form through
//! a [`ResolveListener`]:
//! - every leaf selection that resolves calls `on_resolve(code, label)` once
//! - [`SitePicker::change_selection`] calls `on_resolve("", "")`, the "no site selected" signal
//! - initialising from a stored code never calls the listener

use body_sites::{Taxonomy, TaxonomyNode};

use crate::error::NavigationError;
use crate::navigator::{BodySiteNavigator, SelectOutcome};

/// Receives resolved `(code, label)` pairs from a [`SitePicker`].
pub trait ResolveListener {
    fn on_resolve(&mut self, code: &str, label: &str);
}

impl<F> ResolveListener for F
where
    F: FnMut(&str, &str),
{
    fn on_resolve(&mut self, code: &str, label: &str) {
        (*self)(code, label)
    }
}

pub struct SitePicker<'t, L> {
    navigator: BodySiteNavigator<'t>,
    listener: L,
}

impl<'t, L: ResolveListener> SitePicker<'t, L> {
    /// Open a picker, resolved already if `selected_code` names a known leaf.
    pub fn new(taxonomy: &'t Taxonomy, selected_code: Option<&str>, listener: L) -> Self {
        Self {
            navigator: BodySiteNavigator::with_selected_code(taxonomy, selected_code),
            listener,
        }
    }

    pub fn navigator(&self) -> &BodySiteNavigator<'t> {
        &self.navigator
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Close the picker, handing the listener back to the form.
    pub fn into_listener(self) -> L {
        self.listener
    }

    pub fn select(&mut self, node: &'t TaxonomyNode) -> SelectOutcome {
        let outcome = self.navigator.select(node);
        self.notify(&outcome);
        outcome
    }

    pub fn select_id(&mut self, id: &str) -> Result<SelectOutcome, NavigationError> {
        let outcome = self.navigator.select_id(id)?;
        self.notify(&outcome);
        Ok(outcome)
    }

    pub fn back(&mut self) -> bool {
        self.navigator.back()
    }

    pub fn reset(&mut self) {
        self.navigator.reset();
    }

    /// Discard the current site and start again from the root.
    ///
    /// Previous history is not restored.
    pub fn change_selection(&mut self) {
        self.navigator.reset();
        self.listener.on_resolve("", "");
    }

    fn notify(&mut self, outcome: &SelectOutcome) {
        if let SelectOutcome::Resolved(selection) = outcome {
            let (code, label) = selection.to_pair();
            self.listener.on_resolve(&code, &label);
        }
    }
}
