//! Injury-site fields of a needlestick / sharps incident record.
//!
//! The form stores whatever the picker reports, verbatim: a resolved `(code, label)` pair, or
//! `("", "")` once the user chooses to change the selection.

use body_sites::Taxonomy;
use serde::{Deserialize, Serialize};

use crate::picker::{ResolveListener, SitePicker};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjurySiteFields {
    pub site_code: String,
    pub site_label: String,
}

impl InjurySiteFields {
    /// The stored code, or `None` when no site has been chosen.
    pub fn selected_code(&self) -> Option<&str> {
        let code = self.site_code.trim();
        (!code.is_empty()).then_some(code)
    }

    /// Open a picker for these fields.
    ///
    /// The picker starts resolved when the record already carries a known code. Take the
    /// updated fields back with [`SitePicker::into_listener`].
    pub fn into_picker(self, taxonomy: &Taxonomy) -> SitePicker<'_, Self> {
        let code = self.selected_code().map(str::to_owned);
        SitePicker::new(taxonomy, code.as_deref(), self)
    }
}

impl ResolveListener for InjurySiteFields {
    fn on_resolve(&mut self, code: &str, label: &str) {
        self.site_code = code.to_owned();
        self.site_label = label.to_owned();
    }
}
