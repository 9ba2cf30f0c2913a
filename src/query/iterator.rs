//! Row iteration policies.
//!
//! Both policies share the same per-row step: decode the whole row into a
//! positional value buffer, slice it across destinations in registration
//! order, and commit each destination's fresh instance. The concatenation of
//! the destination slices matches the result set's column order by
//! construction, because the resolver assigns contiguous column
//! sub-sequences in the same order.

use crate::driver::{Cursor, Value};
use crate::error::Error;
use crate::record::destination::Destination;
use crate::resolve::{resolve_positions, PositionList};

/// Resolve columns once, then run the selected policy to completion.
pub(crate) async fn drive_cursor(
    cursor: &mut dyn Cursor,
    destinations: &mut [Box<dyn Destination + '_>],
    first_row_only: bool,
) -> Result<(), Error> {
    let columns = cursor.column_names();
    let descriptors: Vec<_> = destinations.iter().map(|d| d.descriptors()).collect();
    let positions_list = resolve_positions(&columns, &descriptors)?;
    tracing::trace!(
        columns = columns.len(),
        destinations = destinations.len(),
        "resolved column positions"
    );

    if first_row_only {
        scan_first(cursor, columns.len(), &positions_list, destinations).await
    } else {
        scan_all(cursor, columns.len(), &positions_list, destinations).await
    }
}

/// Commit every row. The first decode failure aborts; rows committed before
/// it stay committed.
async fn scan_all(
    cursor: &mut dyn Cursor,
    column_count: usize,
    positions_list: &[PositionList],
    destinations: &mut [Box<dyn Destination + '_>],
) -> Result<(), Error> {
    while cursor.advance().await {
        scan_row(cursor, column_count, positions_list, destinations)?;
    }

    match cursor.last_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Commit at most the first row; zero rows is `NotFound` unless the cursor
/// itself failed. Never advances past the first row.
async fn scan_first(
    cursor: &mut dyn Cursor,
    column_count: usize,
    positions_list: &[PositionList],
    destinations: &mut [Box<dyn Destination + '_>],
) -> Result<(), Error> {
    if cursor.advance().await {
        return scan_row(cursor, column_count, positions_list, destinations);
    }

    match cursor.last_error() {
        Some(err) => Err(err.into()),
        None => Err(Error::NotFound),
    }
}

fn scan_row(
    cursor: &mut dyn Cursor,
    column_count: usize,
    positions_list: &[PositionList],
    destinations: &mut [Box<dyn Destination + '_>],
) -> Result<(), Error> {
    let mut row = vec![Value::Null; column_count];
    cursor.decode_into(&mut row)?;

    let mut offset = 0;
    for (destination, positions) in destinations.iter_mut().zip(positions_list) {
        let width = positions.len();
        destination.bind_row(positions, &row[offset..offset + width])?;
        offset += width;
    }

    Ok(())
}
