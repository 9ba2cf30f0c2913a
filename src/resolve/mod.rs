//! Column-to-field resolution.
//!
//! Given the ordered column names of a result set and the field layouts of
//! the registered destinations, this module computes one position list per
//! destination: an ordered sequence of field paths, entry `i` naming the
//! field that receives column `i` of that destination's slice of the column
//! sequence. Resolution is pure and recomputed on every call; nothing is
//! cached across queries.

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::record::{FieldMeta, FieldPath};

/// Ordered field paths for one destination, aligned with the columns
/// assigned to it.
pub type PositionList = Vec<FieldPath>;

/// Partition `columns` among `destinations` and resolve each slice to field
/// paths.
///
/// Destinations consume contiguous column sub-sequences in registration
/// order; each destination's consumed count is derived from its own field
/// layout, so column boundaries never have to be declared up front. Within a
/// struct, embedded sub-structures claim their blocks first and the struct's
/// own leaf fields are then matched *by name* against the trailing block,
/// which makes leaf resolution tolerant of column reordering.
///
/// Fails with [`SchemaError`] when columns are left over, when a struct's
/// field count runs past the available columns, or when a column name inside
/// a leaf block matches no registered field. No partial result is returned
/// on failure. If several leaf fields register the same name, the last
/// declaration wins.
pub fn resolve_positions(
    columns: &[String],
    destinations: &[Vec<FieldMeta>],
) -> Result<Vec<PositionList>, SchemaError> {
    let mut lists = Vec::with_capacity(destinations.len());
    let mut remaining = columns;
    let mut unmatched = 0usize;

    for fields in destinations {
        let mut positions = PositionList::new();
        let mut prefix = FieldPath::new();
        let used = discover(remaining, fields, &mut prefix, &mut positions, &mut unmatched)?;
        remaining = &remaining[used..];
        lists.push(positions);
    }

    if unmatched > 0 {
        return Err(SchemaError::UnmatchedColumns { count: unmatched });
    }
    if !remaining.is_empty() {
        return Err(SchemaError::UnassignedColumns {
            count: remaining.len(),
        });
    }

    Ok(lists)
}

/// Resolve one struct level against the column sub-sequence handed to it.
///
/// Walks the declared fields once: leaf fields register their resolved name,
/// embedded fields first skip the columns reserved for leaf fields seen so
/// far, then recurse with an extended path prefix. The leaf block itself is
/// matched last, by name lookup. Returns the number of columns this struct
/// consumed: its own leaf count plus everything its embedded sub-structures
/// consumed.
fn discover(
    columns: &[String],
    fields: &[FieldMeta],
    prefix: &mut FieldPath,
    out: &mut PositionList,
    unmatched: &mut usize,
) -> Result<usize, SchemaError> {
    let mut leaf_map: HashMap<&str, FieldPath> = HashMap::with_capacity(fields.len());
    let mut cursor = columns;
    let mut nested = 0usize;

    for (index, field) in fields.iter().enumerate() {
        match field {
            FieldMeta::Skipped => {}
            FieldMeta::Leaf { name } => {
                let mut path = prefix.clone();
                path.push(index);
                leaf_map.insert(*name, path);
            }
            FieldMeta::Embedded { fields: inner } => {
                // Columns for leaf fields already seen sit ahead of this
                // embedded block; step over them without resolving yet.
                let reserved = leaf_map.len();
                if reserved > cursor.len() {
                    return Err(SchemaError::NotEnoughColumns {
                        missing: reserved - cursor.len(),
                    });
                }
                cursor = &cursor[reserved..];

                prefix.push(index);
                let used = discover(cursor, inner, prefix, out, unmatched)?;
                prefix.pop();

                cursor = &cursor[used..];
                nested += used;
            }
        }
    }

    let leaf_count = leaf_map.len();
    if cursor.len() < leaf_count {
        return Err(SchemaError::NotEnoughColumns {
            missing: leaf_count - cursor.len(),
        });
    }

    for name in &cursor[..leaf_count] {
        match leaf_map.get(name.as_str()) {
            Some(path) => out.push(path.clone()),
            // Unmatched columns are counted and reported once the whole
            // resolution has run, so the caller sees the full tally.
            None => *unmatched += 1,
        }
    }

    Ok(leaf_count + nested)
}
