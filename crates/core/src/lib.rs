//! # IPC Core
//!
//! Core logic for the infection-prevention-and-control portal's anatomical site picker.
//!
//! This crate contains:
//! - the drill-down navigator over the body-site taxonomy (`navigator`)
//! - the host-facing picker and its resolve callback contract (`picker`)
//! - the injury-site fields stored on incident records (`incident`)
//! - startup configuration (`config`)
//!
//! **No transport concerns**: HTTP lives in `api-rest`, terminal I/O in `ipc-cli`. The taxonomy
//! data itself lives in `body-sites`.

pub mod config;
pub mod constants;
pub mod error;
pub mod incident;
pub mod navigator;
pub mod picker;

pub use body_sites::{SiteCode, Taxonomy, TaxonomyNode};
pub use config::CoreConfig;
pub use constants::*;
pub use error::{IpcError, IpcResult, NavigationError};
pub use incident::InjurySiteFields;
pub use navigator::{
    BodySiteNavigator, NavigationSnapshot, NavigatorState, NodeSummary, SelectOutcome,
    SiteSelection,
};
pub use picker::{ResolveListener, SitePicker};
