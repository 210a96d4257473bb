//! Minimal element tree for emitting indented HTML.

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Elements that never have content or a closing tag.
fn is_void(tag: &str) -> bool {
    matches!(tag, "meta" | "link" | "br" | "hr" | "img" | "input")
}

/// Escape text content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn append_child(&mut self, child: Element) -> &mut Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Set attributes in order. An existing attribute with the same name is
    /// overwritten in place.
    pub fn set_attributes<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in attrs {
            let key = key.into();
            let value = value.to_string();
            match self.attributes.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => self.attributes.push((key, value)),
            }
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Render this element and its subtree, two spaces per level.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, 0);
        // No trailing newline after the root
        out.truncate(out.trim_end().len());
        out
    }

    fn open_tag(&self) -> String {
        let mut s = format!("<{}", self.tag);
        for (k, v) in &self.attributes {
            s.push_str(&format!(" {}=\"{}\"", k, escape(v)));
        }
        s.push('>');
        s
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        let open = self.open_tag();

        if is_void(&self.tag) {
            out.push_str(&format!("{pad}{open}\n"));
            return;
        }

        match self.children.as_slice() {
            [] => out.push_str(&format!("{pad}{open}</{}>\n", self.tag)),
            [Node::Text(text)] => {
                out.push_str(&format!("{pad}{open}{}</{}>\n", escape(text), self.tag));
            }
            children => {
                out.push_str(&format!("{pad}{open}\n"));
                for child in children {
                    match child {
                        Node::Element(e) => e.write_to(out, depth + 1),
                        Node::Text(text) => {
                            out.push_str(&format!("{}{}\n", INDENT.repeat(depth + 1), escape(text)));
                        }
                    }
                }
                out.push_str(&format!("{pad}</{}>\n", self.tag));
            }
        }
    }
}
