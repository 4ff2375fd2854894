//! Deep-set utility for nested JSON values.
//!
//! Writes a value at a dotted destination path (`"a.b.c"`, with optional
//! `[n]` array indices such as `"servers[2].host"`), creating intermediate
//! containers along the way: objects for key segments, arrays padded with
//! `null` for index segments. An intermediate of the wrong shape is
//! replaced, so the last write at any location wins.

use serde_json::{Map, Value};

/// One step of a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Split a destination path into segments.
///
/// Dots separate key segments; `[n]` is an array index; `["k"]` and `['k']`
/// are quoted key segments. Empty segments are dropped, so `"a..b"` parses
/// the same as `"a.b"`.
pub fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    let flush = |current: &mut String, segments: &mut Vec<Segment>| {
        if !current.is_empty() {
            segments.push(Segment::Key(std::mem::take(current)));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut current, &mut segments),
            '[' => {
                flush(&mut current, &mut segments);
                let mut inner = String::new();
                for n in chars.by_ref() {
                    if n == ']' {
                        break;
                    }
                    inner.push(n);
                }
                if let Ok(index) = inner.parse::<usize>() {
                    segments.push(Segment::Index(index));
                } else {
                    let key = inner.trim_matches(['"', '\'']);
                    if !key.is_empty() {
                        segments.push(Segment::Key(key.to_string()));
                    }
                }
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut segments);
    segments
}

/// Set `value` at `path` inside `root`, creating intermediate containers
/// as needed. An empty path is a no-op.
pub fn set_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = parse_path(path).into_iter();
    let Some(first) = segments.next() else {
        return;
    };
    // The root is always an object, so a leading index is just a key.
    let first = match first {
        Segment::Key(key) => key,
        Segment::Index(index) => index.to_string(),
    };
    let mut cursor = root.entry(first).or_insert(Value::Null);

    for segment in segments {
        match segment {
            Segment::Key(key) => {
                if !cursor.is_object() {
                    *cursor = Value::Object(Map::new());
                }
                let Value::Object(map) = cursor else {
                    unreachable!()
                };
                cursor = map.entry(key).or_insert(Value::Null);
            }
            Segment::Index(index) => {
                if !cursor.is_array() {
                    *cursor = Value::Array(Vec::new());
                }
                let Value::Array(items) = cursor else {
                    unreachable!()
                };
                if items.len() <= index {
                    items.resize(index + 1, Value::Null);
                }
                cursor = &mut items[index];
            }
        }
    }
    *cursor = value;
}
