//! Minimal element tree standing in for a rendered document view.

/// Handle to an element inside a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Behaviour attached to an element's click event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Seek the page's player to the marker's offset
    SeekMarker,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    listeners: Vec<Listener>,
}

/// Element arena rooted at a document node
#[derive(Debug, Clone)]
pub struct Dom {
    elements: Vec<Element>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                tag: "#document".to_string(),
                attrs: Vec::new(),
                parent: None,
                children: Vec::new(),
                listeners: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Append a new element under `parent` and return its handle
    pub fn append(&mut self, parent: ElementId, tag: &str, attrs: &[(&str, &str)]) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            parent: Some(parent),
            children: Vec::new(),
            listeners: Vec::new(),
        });
        self.elements[parent.0].children.push(id);
        id
    }

    pub fn tag(&self, id: ElementId) -> &str {
        &self.elements[id.0].tag
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements[id.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        let attrs = &mut self.elements[id.0].attrs;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }

    /// Nearest inclusive ancestor carrying any of `classes`
    pub fn closest(&self, id: ElementId, classes: &[&str]) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(el) = current {
            if classes.iter().any(|c| self.has_class(el, c)) {
                return Some(el);
            }
            current = self.parent(el);
        }
        None
    }

    /// Descendants of `scope` in document order, excluding `scope` itself
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.elements[scope.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.elements[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Descendants of `scope` with `class`, optionally restricted to `tag`
    pub fn query_all(&self, scope: ElementId, tag: Option<&str>, class: &str) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| tag.is_none_or(|t| self.tag(id).eq_ignore_ascii_case(t)) && self.has_class(id, class))
            .collect()
    }

    pub fn query_first(&self, scope: ElementId, tag: Option<&str>, class: &str) -> Option<ElementId> {
        self.query_all(scope, tag, class).into_iter().next()
    }

    pub fn add_listener(&mut self, id: ElementId, listener: Listener) {
        self.elements[id.0].listeners.push(listener);
    }

    pub fn listeners(&self, id: ElementId) -> &[Listener] {
        &self.elements[id.0].listeners
    }
}
