//! Explodes dotted header names into nested records for the structured
//! output formats.

use crate::app::models::{FieldValue, Header, Row};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

pub type NestedRecord = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(FieldValue),
    Branch(NestedRecord),
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(value) => value.serialize(serializer),
            Node::Branch(map) => map.serialize(serializer),
        }
    }
}

/// Builds one nested record from a header/row pair.
///
/// `"b.c"` and `"b.d"` merge into the same `b` sub-record. Header and row
/// lengths are a caller contract; extra header entries simply read as absent.
pub fn project(header: &Header, row: &Row) -> NestedRecord {
    let mut record = NestedRecord::new();
    for (position, name) in header.iter().enumerate() {
        let value = row.get(position).cloned().unwrap_or(FieldValue::Absent);
        let mut segments = name.split('.').peekable();
        let mut current = &mut record;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), Node::Leaf(value));
                break;
            }
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Node::Branch(NestedRecord::new()));
            if !matches!(entry, Node::Branch(_)) {
                *entry = Node::Branch(NestedRecord::new());
            }
            let Node::Branch(next) = entry else {
                unreachable!("entry was just made a branch")
            };
            current = next;
        }
    }
    record
}

/// Projects every row of a report, preserving row order.
pub fn project_all(header: &Header, rows: &[Row]) -> Vec<NestedRecord> {
    rows.iter().map(|row| project(header, row)).collect()
}
