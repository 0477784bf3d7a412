//! logtree-web - HTML rendering and HTTP transport
//!
//! - [`render`] turns a [`Snapshot`](logtree_app::Snapshot) into the
//!   interactive document
//! - [`sse`] maps a viewer's subscription to an event stream
//! - [`server`] wires the endpoints: `/`, `/events`, `/api/tree`, `/static/*`
//!
//! The browser side of the view-state engine ships as an embedded script
//! (see [`assets`]).

pub mod assets;
pub mod render;
pub mod server;
pub mod sse;

pub use render::{render_document, render_no_source_page, PageContext};
pub use server::{build_router, serve, WebState, EVENTS_PATH};
pub use sse::live_events;
