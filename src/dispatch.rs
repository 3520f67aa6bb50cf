//! Click handling for rendered timestamp markers.
//!
//! Markers are bound once per rendered element: `bind_markers` tags every
//! marker it decorates with `data-vls-bound="1"` and skips tagged ones, so
//! repeated render passes over the same tree never stack listeners.

use log::debug;
use thiserror::Error;

use crate::commands::{IFRAME_CLASS, MARKER_CLASS, SECONDS_ATTR};
use crate::dom::{Dom, ElementId, Listener};
use crate::embed;
use crate::host::Notifier;

pub const BOUND_ATTR: &str = "data-vls-bound";

/// Containers a marker's player is searched in, nearest first
pub const VIEW_CLASSES: [&str; 2] = ["markdown-reading-view", "markdown-preview-view"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClickError {
    #[error("Invalid timestamp.")]
    InvalidSeconds,
    #[error("No video player found on this page (vls-video-iframe).")]
    PlayerNotFound,
}

/// Event state after a marker click
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Attach the seek listener to every unbound marker under `scope`.
///
/// Returns how many markers were newly bound.
pub fn bind_markers(dom: &mut Dom, scope: ElementId) -> usize {
    let mut bound = 0;
    for marker in dom.query_all(scope, None, MARKER_CLASS) {
        if dom.attr(marker, BOUND_ATTR) == Some("1") {
            continue;
        }
        dom.set_attr(marker, BOUND_ATTR, "1");
        dom.add_listener(marker, Listener::SeekMarker);
        bound += 1;
    }
    debug!("Bound {bound} timestamp marker(s)");
    bound
}

/// Deliver a click to `target`, running whatever listeners it carries
pub fn click(dom: &mut Dom, target: ElementId, notifier: &dyn Notifier) -> ClickEvent {
    let mut event = ClickEvent::default();
    for listener in dom.listeners(target).to_vec() {
        match listener {
            Listener::SeekMarker => {
                event.default_prevented = true;
                event.propagation_stopped = true;
                if let Err(e) = seek(dom, target) {
                    notifier.notify(&e.to_string());
                }
            }
        }
    }
    event
}

/// Point the marker's player at the marker's offset.
///
/// Returns the new player source, or `None` when it was already current.
pub fn seek(dom: &mut Dom, marker: ElementId) -> Result<Option<String>, ClickError> {
    let seconds = dom
        .attr(marker, SECONDS_ATTR)
        .unwrap_or("0")
        .trim()
        .parse::<u64>()
        .map_err(|_| ClickError::InvalidSeconds)?;

    let scope = dom.closest(marker, &VIEW_CLASSES).unwrap_or_else(|| dom.root());
    let player = dom
        .query_first(scope, Some("iframe"), IFRAME_CLASS)
        .ok_or(ClickError::PlayerNotFound)?;

    let old_src = dom.attr(player, "src").unwrap_or_default().to_string();
    let new_src = embed::with_start_offset(&old_src, seconds);
    if new_src == old_src {
        return Ok(None);
    }
    debug!("Seeking player to {seconds}s: {new_src}");
    dom.set_attr(player, "src", &new_src);
    Ok(Some(new_src))
}
