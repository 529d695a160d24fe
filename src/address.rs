/*!
 * Stable addressing of structural containers within a document unit.
 *
 * An address is an opaque hierarchical key built from parent index paths
 * (`"2,5,1"` = slide 2, group 5, shape 1). The same traversal that generates
 * an address during extraction regenerates it identically during writeback,
 * so addresses are only ever compared by exact match - no decode exists.
 */

use indexmap::IndexMap;

/// Delimiter between index path segments
pub const SEGMENT_DELIMITER: char = ',';

/// Ordered list of paragraph/cell/run strings extracted from one container.
///
/// The length recorded at extraction time is authoritative: writeback never
/// touches paragraphs past the translated length.
pub type TextUnit = Vec<String>;

/// Address -> TextUnit mapping, insertion order = document traversal order.
///
/// This is both the translation request payload and the result payload;
/// request and result share one key space.
pub type AddressMap = IndexMap<String, TextUnit>;

/// Encode an index path into an address string.
pub fn encode(segments: &[usize]) -> String {
    segments
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(&SEGMENT_DELIMITER.to_string())
}

/// Extend an existing address with one more index segment.
///
/// Used while descending into group shapes, where the parent's address is the
/// prefix for every child.
pub fn child(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        index.to_string()
    } else {
        format!("{}{}{}", prefix, SEGMENT_DELIMITER, index)
    }
}

/// Whether `address` lies at or below `prefix` in the container tree.
///
/// Segment-aware: `"2,51"` does not match prefix `"2,5"`.
pub fn matches_prefix(address: &str, prefix: &str) -> bool {
    match address.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEGMENT_DELIMITER),
        None => false,
    }
}
