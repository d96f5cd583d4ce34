//! The mutable table tree built while parsing.
//!
//! Headers can reopen tables defined earlier, so the tree stays mutable until
//! the whole document has been read. Nodes live in an arena and refer to each
//! other by index; the builder keeps a stack of indices for the current path.
//! [`Tree::consume`] turns the arena into a plain [`Table`] exactly once.

use indexmap::IndexMap;
use std::mem;

use crate::{Table, Value};

pub(crate) type NodeId = usize;

/// What a table key holds: a finished value or another node.
#[derive(Debug)]
pub(crate) enum Entry {
    Value(Value),
    Node(NodeId),
}

#[derive(Debug, Default)]
pub(crate) struct TableNode {
    /// Dotted path of the table, when it has one.
    pub(crate) name: Option<String>,
    /// Created only as a parent of a deeper header, not defined by its own.
    pub(crate) implicit: bool,
    /// Written inline and closed to later keys and headers.
    pub(crate) sealed: bool,
    entries: IndexMap<String, Entry>,
}

#[derive(Debug)]
pub(crate) enum Container {
    Table(TableNode),
    /// Element tables, in order. Never empty.
    TableArray(Vec<NodeId>),
}

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<Container>,
}

impl Tree {
    pub(crate) const ROOT: NodeId = 0;

    pub(crate) fn new() -> Self {
        Tree {
            nodes: vec![Container::Table(TableNode::default())],
        }
    }

    pub(crate) fn new_table(&mut self, name: Option<String>, implicit: bool) -> NodeId {
        self.nodes.push(Container::Table(TableNode {
            name,
            implicit,
            sealed: false,
            entries: IndexMap::new(),
        }));
        self.nodes.len() - 1
    }

    /// A table array holding one fresh element.
    pub(crate) fn new_table_array(&mut self) -> NodeId {
        let first = self.new_table(None, false);
        self.nodes.push(Container::TableArray(vec![first]));
        self.nodes.len() - 1
    }

    /// Appends a fresh element table to a table array.
    pub(crate) fn append_table(&mut self, array: NodeId) -> NodeId {
        let element = self.new_table(None, false);
        if let Container::TableArray(elements) = &mut self.nodes[array] {
            elements.push(element);
        }
        element
    }

    /// The table that keys are added to: the node itself for a table, the
    /// last element for a table array.
    pub(crate) fn current(&self, id: NodeId) -> NodeId {
        match &self.nodes[id] {
            Container::Table(_) => id,
            Container::TableArray(elements) => elements.last().copied().unwrap_or(id),
        }
    }

    fn table(&self, id: NodeId) -> Option<&TableNode> {
        match &self.nodes[self.current(id)] {
            Container::Table(table) => Some(table),
            Container::TableArray(_) => None,
        }
    }

    fn table_mut(&mut self, id: NodeId) -> Option<&mut TableNode> {
        let current = self.current(id);
        match &mut self.nodes[current] {
            Container::Table(table) => Some(table),
            Container::TableArray(_) => None,
        }
    }

    pub(crate) fn get(&self, id: NodeId, key: &str) -> Option<&Entry> {
        self.table(id)?.entries.get(key)
    }

    /// Whether `key` may be bound in `id`: it is free, or it names a table
    /// array that will take another element.
    pub(crate) fn accepts(&self, id: NodeId, key: &str) -> bool {
        match self.get(id, key) {
            None => true,
            Some(Entry::Node(node)) => self.is_table_array(*node),
            Some(Entry::Value(_)) => false,
        }
    }

    pub(crate) fn put(&mut self, id: NodeId, key: &str, entry: Entry) {
        if let Some(table) = self.table_mut(id) {
            table.entries.insert(key.to_string(), entry);
        }
    }

    pub(crate) fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id] {
            Container::Table(table) => table.name.as_deref(),
            Container::TableArray(_) => None,
        }
    }

    pub(crate) fn is_table_array(&self, id: NodeId) -> bool {
        matches!(self.nodes[id], Container::TableArray(_))
    }

    pub(crate) fn is_implicit(&self, id: NodeId) -> bool {
        matches!(&self.nodes[id], Container::Table(table) if table.implicit)
    }

    pub(crate) fn is_sealed(&self, id: NodeId) -> bool {
        matches!(&self.nodes[id], Container::Table(table) if table.sealed)
    }

    pub(crate) fn seal(&mut self, id: NodeId) {
        if let Container::Table(table) = &mut self.nodes[id] {
            table.sealed = true;
        }
    }

    pub(crate) fn make_explicit(&mut self, id: NodeId) {
        if let Container::Table(table) = &mut self.nodes[id] {
            table.implicit = false;
        }
    }

    /// Moves every value out of the arena into an owned [`Table`].
    pub(crate) fn consume(mut self) -> Table {
        self.consume_table(Self::ROOT)
    }

    fn consume_table(&mut self, id: NodeId) -> Table {
        let entries = match &mut self.nodes[id] {
            Container::Table(table) => mem::take(&mut table.entries),
            Container::TableArray(_) => IndexMap::new(),
        };

        entries
            .into_iter()
            .map(|(key, entry)| {
                let value = match entry {
                    Entry::Value(value) => value,
                    Entry::Node(node) => self.consume_node(node),
                };
                (key, value)
            })
            .collect()
    }

    fn consume_node(&mut self, id: NodeId) -> Value {
        if !self.is_table_array(id) {
            return Value::Table(self.consume_table(id));
        }

        let elements = match &mut self.nodes[id] {
            Container::TableArray(elements) => mem::take(elements),
            Container::Table(_) => Vec::new(),
        };
        Value::Array(
            elements
                .into_iter()
                .map(|element| Value::Table(self.consume_table(element)))
                .collect(),
        )
    }
}
