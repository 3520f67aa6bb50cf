//! Builds a rendered view of a note so markers can be clicked outside an editor.
//!
//! Only the inline HTML this crate emits matters here: every `<iframe>` and
//! `<span>` start tag becomes an element under a reading-view container, in
//! document order. Player sources changed by clicks can be written back into
//! the note text.

use std::ops::Range;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::commands::MARKER_CLASS;
use crate::dispatch::{self, ClickEvent};
use crate::dom::{Dom, ElementId};
use crate::host::Notifier;

static START_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(iframe|span)\b([^>]*)>").expect("tag pattern is valid"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute pattern is valid")
});

#[derive(Debug, Clone)]
struct PlayerSource {
    element: ElementId,
    span: Range<usize>,
    original: String,
}

/// A note rendered into a [`Dom`] with its markers already bound
#[derive(Debug, Clone)]
pub struct RenderedNote {
    dom: Dom,
    view: ElementId,
    players: Vec<PlayerSource>,
}

impl RenderedNote {
    pub fn render(text: &str) -> Self {
        let mut dom = Dom::new();
        let view = dom.append(dom.root(), "div", &[("class", "markdown-reading-view")]);
        let mut players = Vec::new();

        for caps in START_TAG.captures_iter(text) {
            let tag = caps[1].to_ascii_lowercase();
            let body = caps.get(2).map_or(0..0, |m| m.range());
            let element = dom.append(view, &tag, &[]);

            for attr in ATTRIBUTE.captures_iter(&text[body.clone()]) {
                let name = attr[1].to_ascii_lowercase();
                let value = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4));
                let decoded = value.map_or_else(String::new, |v| {
                    html_escape::decode_html_entities(v.as_str()).into_owned()
                });
                if dom.attr(element, &name).is_some() {
                    continue;
                }
                dom.set_attr(element, &name, &decoded);

                if tag == "iframe" && name == "src" {
                    if let Some(v) = value {
                        players.push(PlayerSource {
                            element,
                            span: body.start + v.start()..body.start + v.end(),
                            original: decoded.clone(),
                        });
                    }
                }
            }
        }

        let bound = dispatch::bind_markers(&mut dom, view);
        debug!("Rendered note: {bound} marker(s), {} player(s)", players.len());
        Self { dom, view, players }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn view(&self) -> ElementId {
        self.view
    }

    /// Timestamp markers in document order
    pub fn markers(&self) -> Vec<ElementId> {
        self.dom.query_all(self.view, Some("span"), MARKER_CLASS)
    }

    /// Click the `index`-th marker (zero-based); `None` when there is no such marker
    pub fn click_marker(&mut self, index: usize, notifier: &dyn Notifier) -> Option<ClickEvent> {
        let marker = *self.markers().get(index)?;
        Some(dispatch::click(&mut self.dom, marker, notifier))
    }

    /// Current source of every player, in document order
    pub fn player_sources(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| self.dom.attr(p.element, "src").unwrap_or_default().to_string())
            .collect()
    }

    /// `text` (the note this was rendered from) with changed player sources
    /// spliced back in
    pub fn write_back(&self, text: &str) -> String {
        let mut out = text.to_string();
        for player in self.players.iter().rev() {
            let current = self.dom.attr(player.element, "src").unwrap_or_default();
            if current != player.original {
                out.replace_range(player.span.clone(), &current.replace('"', "&quot;"));
            }
        }
        out
    }
}
