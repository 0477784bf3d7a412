//! Indentation-to-tree construction.
//!
//! A line becomes a child of the nearest preceding line with a strictly
//! smaller depth. The builder keeps the currently open ancestors on an
//! explicit stack of owned entries; an entry is attached to its parent (or
//! to the forest) when it is popped, which happens in file order. One linear
//! pass, stack bounded by the maximum depth.

use crate::parse::split_indent;
use crate::types::LogEntry;

/// Incremental forest builder
#[derive(Debug, Default)]
pub struct TreeBuilder {
    /// Open entries, strictly increasing depth from bottom to top
    stack: Vec<LogEntry>,
    /// Completed roots in file order
    roots: Vec<LogEntry>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line (indentation included). Blank lines are ignored.
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return;
        }
        let (depth, rest) = split_indent(line);
        self.push_entry(LogEntry::parse(rest, depth));
    }

    /// Attach a parsed entry according to its depth
    pub fn push_entry(&mut self, entry: LogEntry) {
        while self
            .stack
            .last()
            .is_some_and(|top| top.depth >= entry.depth)
        {
            self.close_top();
        }
        self.stack.push(entry);
    }

    /// Pop the top of the stack into its parent or the forest
    fn close_top(&mut self) {
        let Some(done) = self.stack.pop() else {
            return;
        };
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => self.roots.push(done),
        }
    }

    /// Close every open entry and return the ordered forest
    pub fn finish(mut self) -> Vec<LogEntry> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.roots
    }
}

/// Build an ordered forest from raw lines in file order
pub fn build_forest<I, S>(lines: I) -> Vec<LogEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = TreeBuilder::new();
    for line in lines {
        builder.push_line(line.as_ref());
    }
    builder.finish()
}

/// Depth-first, pre-order iterator over a forest
pub struct DepthFirst<'a> {
    pending: Vec<&'a LogEntry>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.pending.pop()?;
        self.pending.extend(entry.children.iter().rev());
        Some(entry)
    }
}

/// Walk a forest depth-first; yields entries in original file order
pub fn depth_first(forest: &[LogEntry]) -> DepthFirst<'_> {
    DepthFirst {
        pending: forest.iter().rev().collect(),
    }
}

/// Total number of entries in a forest
pub fn count_entries(forest: &[LogEntry]) -> usize {
    forest.iter().map(LogEntry::subtree_len).sum()
}
