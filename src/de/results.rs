//! Builds the table tree from headers and key/value pairs.
//!
//! The builder keeps a stack of node ids from the root to the table that new
//! keys go into. A table array contributes two entries: the array itself and
//! its current element. Every header rewinds the stack to the root and walks
//! down again along its dotted name.

use tracing::trace;

use crate::de::container::{Entry, NodeId, Tree};
use crate::de::context::Context;
use crate::de::identifier::Identifier;
use crate::{Table, Value};

pub(crate) struct Results {
    tree: Tree,
    stack: Vec<NodeId>,
}

impl Results {
    pub(crate) fn new() -> Self {
        Results {
            tree: Tree::new(),
            stack: vec![Tree::ROOT],
        }
    }

    fn top(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(Tree::ROOT)
    }

    /// Path of the innermost named table on the stack, extended by `key`.
    /// Inside a table array there is no stable path and `None` is returned.
    pub(crate) fn inline_table_path(&self, key: &str) -> Option<String> {
        for &id in self.stack.iter().rev() {
            if self.tree.is_table_array(id) {
                return None;
            }
            if let Some(name) = self.tree.name(id) {
                return Some(format!("{name}.{key}"));
            }
        }
        Some(key.to_string())
    }

    /// Binds `key` in the current table.
    ///
    /// An inline table becomes a sealed table node: a later `[header]` for it
    /// collides as with any explicit table, and nothing may add keys to it
    /// afterwards, through a dotted key or a sub-table header.
    pub(crate) fn add_value(&mut self, key: &str, value: Value, ctx: &mut Context<'_>) {
        let inline = match value {
            Value::Table(inline) => inline,
            value => {
                self.bind(key, Entry::Value(value), ctx);
                return;
            }
        };

        let path = self.inline_table_path(key);
        trace!(key, path = path.as_deref(), "splicing inline table");
        let node = self.tree.new_table(path, false);
        if !self.bind(key, Entry::Node(node), ctx) {
            return;
        }

        self.stack.push(node);
        for (inner_key, inner_value) in inline {
            self.add_value(&inner_key, inner_value, ctx);
        }
        self.stack.pop();
        self.tree.seal(node);
    }

    /// Binds a dotted key, creating implicit tables for the leading segments.
    pub(crate) fn add_dotted_value(&mut self, identifier: &Identifier, value: Value, ctx: &mut Context<'_>) {
        let Some((last, parents)) = identifier.segments().split_last() else {
            return;
        };

        let depth = self.stack.len();
        for segment in parents {
            let top = self.top();
            let next = match self.tree.get(top, segment) {
                Some(Entry::Node(node))
                    if !self.tree.is_table_array(*node) && !self.tree.is_sealed(*node) =>
                {
                    *node
                }
                Some(_) => {
                    let line = ctx.line();
                    ctx.errors.duplicate_key(identifier.name(), Some(line));
                    self.stack.truncate(depth);
                    return;
                }
                None => {
                    let path = self.inline_table_path(segment);
                    let node = self.tree.new_table(path, true);
                    self.tree.put(top, segment, Entry::Node(node));
                    node
                }
            };
            self.stack.push(next);
        }

        self.add_value(last, value, ctx);
        self.stack.truncate(depth);
    }

    /// Binds a key given by its full identifier, dotted or not.
    pub(crate) fn add_key(&mut self, identifier: &Identifier, value: Value, ctx: &mut Context<'_>) {
        match identifier.segments() {
            [key] => self.add_value(key, value, ctx),
            _ => self.add_dotted_value(identifier, value, ctx),
        }
    }

    fn bind(&mut self, key: &str, entry: Entry, ctx: &mut Context<'_>) -> bool {
        let top = self.top();
        let line = ctx.line();
        match self.tree.get(top, key) {
            None => {
                self.tree.put(top, key, entry);
                true
            }
            Some(Entry::Node(_)) => {
                ctx.errors.key_duplicates_table(key, line);
                false
            }
            Some(Entry::Value(_)) => {
                ctx.errors.duplicate_key(key, Some(line));
                false
            }
        }
    }

    /// Opens the table named by a `[header]`, creating implicit parents.
    pub(crate) fn start_tables(&mut self, identifier: &Identifier, ctx: &mut Context<'_>) {
        let name = identifier.bare_name();
        let line = ctx.line();
        let segments = identifier.segments();
        trace!(table = name, line, "starting table");

        self.stack.truncate(1);
        for (index, segment) in segments.iter().enumerate() {
            let last = index + 1 == segments.len();
            let top = self.top();

            match self.tree.get(top, segment) {
                Some(&Entry::Node(node)) if self.tree.is_sealed(node) => {
                    ctx.errors.duplicate_table(name, line);
                    self.detach();
                    return;
                }
                Some(&Entry::Node(node)) => {
                    if last {
                        if !self.tree.is_implicit(node) {
                            ctx.errors.duplicate_table(name, line);
                            self.detach();
                            return;
                        }
                        self.tree.make_explicit(node);
                    }
                    self.stack.push(node);
                    if self.tree.is_table_array(node) {
                        self.stack.push(self.tree.current(node));
                    }
                }
                _ if self.tree.accepts(top, segment) => {
                    let path = segments[..=index].join(".");
                    let node = self.tree.new_table(Some(path), !last);
                    self.tree.put(top, segment, Entry::Node(node));
                    self.stack.push(node);
                }
                _ => {
                    ctx.errors.table_duplicates_key(name, line);
                    self.detach();
                    return;
                }
            }
        }
    }

    /// Opens a new element of the table array named by a `[[header]]`.
    pub(crate) fn start_table_array(&mut self, identifier: &Identifier, ctx: &mut Context<'_>) {
        let name = identifier.bare_name();
        let line = ctx.line();
        let segments = identifier.segments();
        trace!(table_array = name, line, "starting table array element");

        self.stack.truncate(1);
        for (index, segment) in segments.iter().enumerate() {
            let last = index + 1 == segments.len();
            let top = self.top();

            match self.tree.get(top, segment) {
                Some(&Entry::Node(node)) if self.tree.is_table_array(node) => {
                    self.stack.push(node);
                    if last {
                        self.tree.append_table(node);
                    }
                    self.stack.push(self.tree.current(node));
                }
                Some(&Entry::Node(node)) if !last && !self.tree.is_sealed(node) => {
                    self.stack.push(node);
                }
                None => {
                    let node = if last {
                        self.tree.new_table_array()
                    } else {
                        self.tree.new_table(Some(segments[..=index].join(".")), true)
                    };
                    self.tree.put(top, segment, Entry::Node(node));
                    self.stack.push(node);
                    if last {
                        self.stack.push(self.tree.current(node));
                    }
                }
                _ => {
                    ctx.errors.duplicate_table(name, line);
                    self.detach();
                    return;
                }
            }
        }
    }

    /// Sends the keys that follow a rejected header into a scratch table that
    /// is never attached, so they do not raise follow-on errors.
    pub(crate) fn detach(&mut self) {
        let scratch = self.tree.new_table(None, false);
        self.stack.truncate(1);
        self.stack.push(scratch);
    }

    pub(crate) fn consume(self) -> Table {
        self.tree.consume()
    }
}
