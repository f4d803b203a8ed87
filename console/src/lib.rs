//! Terminal front-end for the scheduling backend.
//!
//! `render` resolves a browser-style path, loads its page through the
//! services and draws it inside the layout. `actions` holds the bulk
//! operations exposed as subcommands.

pub mod actions;
pub mod layout;
pub mod pages;

use horarios_core::{ApiClient, Route, ViewState};
use tracing::debug;

use crate::layout::Screen;

/// Draw the full screen for `path`.
pub fn render(client: &ApiClient, path: &str) -> String {
    let view = ViewState::for_route(Route::resolve(path));
    debug!(path, route = ?view.route, base_url = client.config().base_url(), "rendering view");
    let page = pages::load(client, &view.route);
    debug!(title = page.title, failed = page.is_error(), "page loaded");
    Screen::new(&view, &page).to_string()
}
