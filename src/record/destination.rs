//! Row binding into caller-supplied destinations.
//!
//! A destination pairs a borrow of caller memory with a commit policy. Each
//! row, a fresh instance of the leaf struct is allocated, populated through
//! the destination's position list, and then either overwrites a single
//! struct or is appended to a growing sequence.

use crate::driver::Value;
use crate::error::DecodeError;
use crate::record::{FieldMeta, FieldPath, Record};

/// Type-erased destination handle held by a query.
///
/// One implementation exists per destination shape; the shape is fixed at
/// registration time by which `scan` method the caller used.
pub(crate) trait Destination: Send {
    /// Field layout of the leaf struct type, for the resolver.
    fn descriptors(&self) -> Vec<FieldMeta>;

    /// Bind one row: allocate a fresh instance, write `values[i]` through
    /// `positions[i]`, and commit it into the caller's memory.
    fn bind_row(&mut self, positions: &[FieldPath], values: &[Value])
        -> Result<(), DecodeError>;
}

fn fill<T: Record>(positions: &[FieldPath], values: &[Value]) -> Result<T, DecodeError> {
    let mut fresh = T::default();
    for (path, value) in positions.iter().zip(values.iter()) {
        fresh.put(path, value.clone())?;
    }
    Ok(fresh)
}

/// Single struct, overwritten on every committed row.
///
/// Paired with the all-rows policy this deliberately keeps the last row's
/// values; callers who want exactly one row use the first-row policy instead.
pub(crate) struct SingleDest<'a, T: Record>(pub(crate) &'a mut T);

impl<T: Record> Destination for SingleDest<'_, T> {
    fn descriptors(&self) -> Vec<FieldMeta> {
        T::descriptors()
    }

    fn bind_row(
        &mut self,
        positions: &[FieldPath],
        values: &[Value],
    ) -> Result<(), DecodeError> {
        *self.0 = fill(positions, values)?;
        Ok(())
    }
}

/// Growable sequence of structs, appended in row arrival order.
pub(crate) struct VecDest<'a, T: Record>(pub(crate) &'a mut Vec<T>);

impl<T: Record> Destination for VecDest<'_, T> {
    fn descriptors(&self) -> Vec<FieldMeta> {
        T::descriptors()
    }

    fn bind_row(
        &mut self,
        positions: &[FieldPath],
        values: &[Value],
    ) -> Result<(), DecodeError> {
        self.0.push(fill(positions, values)?);
        Ok(())
    }
}

/// Growable sequence of boxed structs, appended in row arrival order.
pub(crate) struct BoxedVecDest<'a, T: Record>(pub(crate) &'a mut Vec<Box<T>>);

impl<T: Record> Destination for BoxedVecDest<'_, T> {
    fn descriptors(&self) -> Vec<FieldMeta> {
        T::descriptors()
    }

    fn bind_row(
        &mut self,
        positions: &[FieldPath],
        values: &[Value],
    ) -> Result<(), DecodeError> {
        self.0.push(Box::new(fill(positions, values)?));
        Ok(())
    }
}
