//! Minimal typed builder for HCL documents.
//!
//! Covers what a Terraform configuration file needs: labelled blocks,
//! attributes, string literals, raw references/expressions, numbers,
//! booleans, lists and objects. Output is deterministic: entries render in
//! insertion order with two-space indentation.

use std::fmt::Write;

/// An attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string literal; escaped on render
    String(String),
    Number(i64),
    Bool(bool),
    /// Unquoted expression such as `data.aws_vpc.main.id`
    Expression(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn expr(expression: impl Into<String>) -> Self {
        Self::Expression(expression.into())
    }

    /// Function call expression, e.g. `element(list, 0)`
    pub fn call(function: &str, args: &[Value]) -> Self {
        let rendered: Vec<String> = args.iter().map(Value::render_inline).collect();
        Self::Expression(format!("{}({})", function, rendered.join(", ")))
    }

    fn render_inline(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, 0);
        out
    }

    fn render(&self, out: &mut String, indent: usize) {
        match self {
            Value::String(s) => {
                out.push('"');
                out.push_str(&escape(s));
                out.push('"');
            }
            Value::Number(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Value::Expression(e) => out.push_str(e),
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render(out, indent);
                }
                out.push(']');
            }
            Value::Object(entries) => {
                if entries.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{\n");
                for (key, value) in entries {
                    push_indent(out, indent + 1);
                    out.push_str(&object_key(key));
                    out.push_str(" = ");
                    value.render(out, indent + 1);
                    out.push('\n');
                }
                push_indent(out, indent);
                out.push('}');
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Attribute(String, Value),
    Block(Block),
}

/// A block such as `resource "aws_lb" "application_lb" { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    kind: String,
    labels: Vec<String>,
    entries: Vec<Entry>,
}

impl Block {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            labels: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// `resource "<resource_type>" "<name>"`
    pub fn resource(resource_type: &str, name: &str) -> Self {
        Self::new("resource").label(resource_type).label(name)
    }

    /// `data "<data_type>" "<name>"`
    pub fn data(data_type: &str, name: &str) -> Self {
        Self::new("data").label(data_type).label(name)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push(Entry::Attribute(key.into(), value.into()));
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.entries.push(Entry::Block(block));
        self
    }

    fn render(&self, out: &mut String, indent: usize) {
        push_indent(out, indent);
        out.push_str(&self.kind);
        for label in &self.labels {
            out.push_str(" \"");
            out.push_str(&escape(label));
            out.push('"');
        }

        if self.entries.is_empty() {
            out.push_str(" {}\n");
            return;
        }

        out.push_str(" {\n");
        for entry in &self.entries {
            match entry {
                Entry::Attribute(key, value) => {
                    push_indent(out, indent + 1);
                    out.push_str(key);
                    out.push_str(" = ");
                    value.render(out, indent + 1);
                    out.push('\n');
                }
                Entry::Block(block) => {
                    out.push('\n');
                    block.render(out, indent + 1);
                }
            }
        }
        push_indent(out, indent);
        out.push_str("}\n");
    }
}

/// A whole configuration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            block.render(&mut out, 0);
        }
        out
    }
}

#[cfg(test)]
impl Block {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Value of a direct attribute
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Attribute(k, v) if k == key => Some(v),
            _ => None,
        })
    }
}

#[cfg(test)]
impl Document {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Top-level blocks with the given kind and first label
    pub fn find(&self, kind: &str, first_label: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.kind == kind && b.labels.first().map(String::as_str) == Some(first_label))
            .collect()
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn object_key(key: &str) -> String {
    let is_identifier = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if is_identifier {
        key.to_string()
    } else {
        format!("\"{}\"", escape(key))
    }
}

/// Escape a string literal so it can't break out of its quotes or start a
/// template interpolation
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(c);
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }

    escaped
}
