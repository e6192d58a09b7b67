//! # lookup
//!
//! Headless lookup (typeahead) widgets for form inputs backed by the portal's
//! key/value suggestion service.
//!
//! - [`LookupPage`]: binds elements, routes interactions, pumps network
//!   completions and timers
//! - [`Widget`]: per-element state (single- or multi-value)
//! - [`render_menu`]: query + items → suggestion rows
//! - [`SelectionSet`]: ordered, case-insensitively unique chip values
//!
//! Network traffic goes through a [`bus::Bus`]; pair the page with
//! `runtime_net::start_lookup_runtime` for real requests, or drive the bus
//! by hand in tests.

pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod menu;
pub mod page;
pub mod registry;
pub mod selection;
pub mod toast;
mod widget;

pub use config::{ConfigError, ElementAttrs, LookupMode, LookupSettings, WidgetConfig};
pub use debounce::Debouncer;
pub use dispatch::{EventOutcome, InteractionKind, Key, WidgetEvent};
pub use menu::{Menu, MenuAction, MenuRow, RenderContext, RowKind, render_menu};
pub use page::{LookupElement, LookupPage, ValueObserver};
pub use registry::BindingRegistry;
pub use selection::SelectionSet;
pub use toast::Toast;
pub use widget::{HiddenField, Phase, QueryState, Widget};
