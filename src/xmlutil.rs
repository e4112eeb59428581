//! Small XML writing helpers shared by the CAML builder, the property bag
//! codec and the batch request serializer.
//!
//! SharePoint rejects malformed request XML with an opaque server fault, so
//! every attribute and text value that originates from user input goes
//! through [`escape_xml`].

/// Escape the five XML special characters in a value.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Indented XML document builder.
#[derive(Debug)]
pub struct XmlWriter {
    indent_level: usize,
    buffer: String,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn unindent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn add_line(&mut self, line: &str) {
        for _ in 0..self.indent_level {
            self.buffer.push_str("  ");
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    pub fn add_opening_tag(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.add_line(&format_tag(name, attributes, false));
        self.indent();
    }

    pub fn add_closing_tag(&mut self, name: &str) {
        self.unindent();
        self.add_line(&format!("</{}>", name));
    }

    pub fn add_self_closing_tag(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.add_line(&format_tag(name, attributes, true));
    }

    pub fn add_text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) {
        let mut line = format_tag(name, attributes, false);
        line.push_str(&escape_xml(text));
        line.push_str(&format!("</{}>", name));
        self.add_line(&line);
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_tag(name: &str, attributes: &[(&str, &str)], self_closing: bool) -> String {
    let mut tag = format!("<{}", name);
    for (key, value) in attributes {
        tag.push_str(&format!(" {}=\"{}\"", key, escape_xml(value)));
    }
    tag.push_str(if self_closing { "/>" } else { ">" });
    tag
}
