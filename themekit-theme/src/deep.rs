//! Deep clone, deep merge and path traversal over [PropertyValue] trees.
//!
//! Merge policy: records merge key by key, everything else (scalars, dates,
//! lists, null) replaces the target wholesale. Lists are never merged
//! element-wise. Trees are assumed acyclic, which owned trees always are.

use crate::value::{PropertyMap, PropertyValue};

/// Separator used by dotted property paths.
pub const PATH_SEPARATOR: char = '.';

/// Copy a node and everything below it.
pub fn deep_clone(value: &PropertyValue) -> PropertyValue {
    match value {
        PropertyValue::List(items) => PropertyValue::List(items.iter().map(deep_clone).collect()),
        PropertyValue::Record(map) => PropertyValue::Record(clone_map(map)),
        scalar => scalar.clone(),
    }
}

/// Copy a record and everything below it.
pub fn clone_map(map: &PropertyMap) -> PropertyMap {
    map.iter()
        .map(|(key, value)| (key.clone(), deep_clone(value)))
        .collect()
}

/// Merge `source` over `target`, returning a new tree.
///
/// A non-record `source` replaces `target`. When both are records, the result
/// starts from `target` and takes every key of `source`, recursing into
/// record-valued keys.
pub fn deep_merge(target: &PropertyValue, source: &PropertyValue) -> PropertyValue {
    match (target, source) {
        (PropertyValue::Record(target), PropertyValue::Record(source)) => {
            PropertyValue::Record(merge_maps(target, source))
        },
        (_, source) => deep_clone(source),
    }
}

/// Merge two records key by key.
///
/// A record-valued source key merges into the target's value at that key; a
/// missing or non-record target value is treated as an empty record. Any other
/// source value overwrites the target value outright.
pub fn merge_maps(target: &PropertyMap, source: &PropertyMap) -> PropertyMap {
    let mut merged = target.clone();

    for (key, source_value) in source {
        let next = match source_value {
            PropertyValue::Record(source_map) => {
                let base = match merged.get(key) {
                    Some(PropertyValue::Record(target_map)) => merge_maps(target_map, source_map),
                    _ => merge_maps(&PropertyMap::new(), source_map),
                };
                PropertyValue::Record(base)
            },
            other => deep_clone(other),
        };
        // IndexMap keeps the original position of keys that already existed.
        merged.insert(key.clone(), next);
    }

    merged
}

/// Split a dotted path into segments. Returns `None` for an empty path or a
/// path with empty segments (`"a..b"`, `".a"`).
pub fn split_path(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Walk `segments` one key at a time starting at `root`.
///
/// Any missing key or non-record intermediate ends the walk with `None`.
pub fn get_in<'a>(root: &'a PropertyMap, segments: &[&str]) -> Option<&'a PropertyValue> {
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(*first)?;
    for segment in rest {
        current = current.as_record()?.get(*segment)?;
    }
    Some(current)
}

/// Resolve a dotted path inside a record.
pub fn get_path<'a>(root: &'a PropertyMap, path: &str) -> Option<&'a PropertyValue> {
    let segments = split_path(path)?;
    get_in(root, &segments)
}

/// Write `value` at a dotted path, creating intermediate records.
///
/// A non-record node in the way is replaced by a record. Returns `false`
/// without touching `root` when the path is malformed.
pub fn set_path(root: &mut PropertyMap, path: &str, value: PropertyValue) -> bool {
    let Some(segments) = split_path(path) else {
        return false;
    };
    let Some((leaf, scopes)) = segments.split_last() else {
        return false;
    };

    let mut current = root;
    for segment in scopes {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| PropertyValue::Record(PropertyMap::new()));
        if !slot.is_record() {
            *slot = PropertyValue::Record(PropertyMap::new());
        }
        current = match slot {
            PropertyValue::Record(map) => map,
            _ => return false,
        };
    }
    current.insert(leaf.to_string(), value);
    true
}

/// Every dotted path that ends at a non-record node.
///
/// Lists count as leaves. Empty records produce no path.
pub fn leaf_paths(root: &PropertyMap) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaf_paths(root, &mut String::new(), &mut paths);
    paths
}

fn collect_leaf_paths(map: &PropertyMap, prefix: &mut String, out: &mut Vec<String>) {
    for (key, value) in map {
        let restore = prefix.len();
        if !prefix.is_empty() {
            prefix.push(PATH_SEPARATOR);
        }
        prefix.push_str(key);

        match value {
            PropertyValue::Record(child) => collect_leaf_paths(child, prefix, out),
            _ => out.push(prefix.clone()),
        }

        prefix.truncate(restore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(json: &str) -> PropertyMap {
        match serde_json::from_str::<PropertyValue>(json).unwrap() {
            PropertyValue::Record(map) => map,
            other => panic!("expected a record, got {}", other.kind()),
        }
    }

    #[test]
    fn test_merge_records_recursively() {
        let target = tree(r##"{"primary": {"main": "#111", "light": "#222"}, "text": {"body": "#000"}}"##);
        let source = tree(r##"{"primary": {"main": "#999"}}"##);

        let merged = merge_maps(&target, &source);
        assert_eq!(get_path(&merged, "primary.main").unwrap().as_str(), Some("#999"));
        assert_eq!(get_path(&merged, "primary.light").unwrap().as_str(), Some("#222"));
        assert_eq!(get_path(&merged, "text.body").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn test_merge_replaces_lists_wholesale() {
        let target = tree(r#"{"fonts": ["Roboto", "Arial", "sans-serif"]}"#);
        let source = tree(r#"{"fonts": ["Inter"]}"#);

        let merged = merge_maps(&target, &source);
        assert_eq!(
            merged["fonts"],
            PropertyValue::List(vec![PropertyValue::from("Inter")])
        );
    }

    #[test]
    fn test_merge_scalar_replaces_record_and_back() {
        let target = tree(r#"{"a": {"b": 1}, "c": 5}"#);
        let source = tree(r#"{"a": "flat", "c": {"d": 2}}"#);

        let merged = merge_maps(&target, &source);
        assert_eq!(merged["a"].as_str(), Some("flat"));
        // A non-record target under a record source is treated as empty.
        assert_eq!(merged["c"], PropertyValue::Record(tree(r#"{"d": 2}"#)));
    }

    #[test]
    fn test_merge_null_replaces() {
        let target = tree(r#"{"a": {"b": 1}}"#);
        let source = tree(r#"{"a": null}"#);
        assert!(merge_maps(&target, &source)["a"].is_null());
    }

    #[test]
    fn test_merge_keeps_key_order() {
        let target = tree(r#"{"x": 1, "y": 2, "z": 3}"#);
        let source = tree(r#"{"w": 0, "y": 20}"#);

        let merged = merge_maps(&target, &source);
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn test_deep_merge_non_record_source() {
        let target = PropertyValue::Record(tree(r#"{"a": 1}"#));
        assert_eq!(deep_merge(&target, &PropertyValue::Number(3.0)), PropertyValue::Number(3.0));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = tree(r#"{"a": {"b": [1, {"c": 2}]}}"#);
        let mut copy = clone_map(&original);
        assert_eq!(copy, original);

        if let Some(PropertyValue::Record(inner)) = copy.get_mut("a") {
            inner.insert("b".to_string(), PropertyValue::Null);
        }
        assert_ne!(copy, original);
        assert!(get_path(&original, "a.b").unwrap().as_list().is_some());
    }

    #[test]
    fn test_get_path_edges() {
        let root = tree(r#"{"a": {"b": {"c": "leaf"}, "s": "str"}}"#);
        assert_eq!(get_path(&root, "a.b.c").unwrap().as_str(), Some("leaf"));
        assert!(get_path(&root, "a.b").unwrap().is_record());
        assert!(get_path(&root, "a.s.x").is_none());
        assert!(get_path(&root, "a.missing.c").is_none());
        assert!(get_path(&root, "").is_none());
        assert!(get_path(&root, "a..b").is_none());
    }

    #[test]
    fn test_set_path_creates_records() {
        let mut root = tree(r#"{"a": {"keep": 1}, "flat": 2}"#);
        assert!(set_path(&mut root, "a.b.c", PropertyValue::from("x")));
        assert!(set_path(&mut root, "flat.inner", PropertyValue::from(true)));
        assert!(!set_path(&mut root, "a..c", PropertyValue::Null));

        assert_eq!(get_path(&root, "a.b.c").unwrap().as_str(), Some("x"));
        assert_eq!(get_path(&root, "a.keep").unwrap().as_number(), Some(1.0));
        assert_eq!(get_path(&root, "flat.inner").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_leaf_paths() {
        let root = tree(r#"{"a": {"b": 1, "c": {"d": true}}, "e": [1, 2], "empty": {}}"#);
        assert_eq!(leaf_paths(&root), vec!["a.b", "a.c.d", "e"]);
    }
}
