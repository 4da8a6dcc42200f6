//! Minimal document tree for translatable page content.
//!
//! Elements carry a tag, an optional id, attributes and child nodes. The
//! translation pass walks the tree and rewrites the text of every element
//! tagged with a translation key.

use std::collections::BTreeMap;

/// Attribute holding the translation key of an element's text
pub const I18N_ATTR: &str = "data-i18n";
/// Attribute holding the translation key of an element's placeholder
pub const I18N_PLACEHOLDER_ATTR: &str = "data-i18n-placeholder";
pub const PLACEHOLDER_ATTR: &str = "placeholder";

/// Tags whose text is rewritten when they are the single child of a keyed element
const INLINE_TEXT_TAGS: &[&str] = &["span", "p", "h1", "h2", "h3"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            id: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Shorthand for `with_attr(I18N_ATTR, key)`
    pub fn with_key(self, key: &str) -> Self {
        self.with_attr(I18N_ATTR, key)
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(e) => out.push_str(&e.text_content()),
            }
        }
        out
    }

    /// Replaces every child with a single text node
    pub fn set_text_content(&mut self, text: &str) {
        self.children = vec![Node::Text(text.to_string())];
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(child) => child.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }

    fn apply_text_translation(&mut self, translation: String) {
        match self.tag.as_str() {
            "input" | "textarea" => {}
            "option" | "optgroup" => self.set_text_content(&translation),
            _ => {
                let element_count = self.child_elements().count();
                if element_count == 0 {
                    self.set_text_content(&translation);
                    return;
                }

                // Blank text nodes around a lone inline child don't count
                let has_direct_text = self
                    .children
                    .iter()
                    .any(|node| matches!(node, Node::Text(text) if !text.trim().is_empty()));
                if element_count == 1 && !has_direct_text {
                    let only = self.children.iter_mut().find_map(|node| match node {
                        Node::Element(child) => Some(child),
                        Node::Text(_) => None,
                    });
                    if let Some(only) = only {
                        if INLINE_TEXT_TAGS.contains(&only.tag.as_str()) {
                            only.set_text_content(&translation);
                            return;
                        }
                    }
                }

                let first_text = self.children.iter_mut().find_map(|node| match node {
                    Node::Text(text) if !text.trim().is_empty() => Some(text),
                    _ => None,
                });
                match first_text {
                    Some(text) => *text = translation,
                    None => self.children.insert(0, Node::Text(translation)),
                }
            }
        }
    }

    fn translate_tree(&mut self, t: &dyn Fn(&str) -> String) -> usize {
        let mut updated = 0;

        if let Some(key) = self.attr(I18N_ATTR).filter(|k| !k.is_empty()).map(str::to_string) {
            self.apply_text_translation(t(&key));
            updated += 1;
        }

        if let Some(key) = self
            .attr(I18N_PLACEHOLDER_ATTR)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
        {
            self.attributes.insert(PLACEHOLDER_ATTR.to_string(), t(&key));
            updated += 1;
        }

        for node in &mut self.children {
            if let Node::Element(child) = node {
                updated += child.translate_tree(t);
            }
        }
        updated
    }
}

/// The page as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find_by_id(id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_by_id_mut(id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Rewrites every keyed text and placeholder; returns how many were updated
    pub fn apply_translations(&mut self, t: &dyn Fn(&str) -> String) -> usize {
        self.root.translate_tree(t)
    }
}
