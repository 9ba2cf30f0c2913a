//! Destination struct registration.
//!
//! A destination struct takes part in column resolution by describing its
//! fields: each accessible field is either a *leaf* bound to one result
//! column, an *embedded* sub-structure whose own fields are flattened into
//! the parent, or *skipped*. Registration happens once per type through the
//! [`Record`] trait, usually via the [`impl_record!`](crate::impl_record)
//! macro.

pub(crate) mod destination;

use crate::driver::Value;
use crate::error::DecodeError;

/// Ordered field indices locating a leaf field through zero or more
/// embedding levels. Index `i` selects the `i`-th declared field (skipped
/// fields included) at that level.
pub type FieldPath = Vec<usize>;

/// Resolution-time description of one declared struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMeta {
    /// Field bound directly to one column. `name` is the tag override if one
    /// was given, else the field's own identifier.
    Leaf { name: &'static str },
    /// Struct-typed field whose fields are flattened into the parent's
    /// resolution, recursively.
    Embedded { fields: Vec<FieldMeta> },
    /// Field excluded from resolution. Present so sibling indices keep
    /// matching declaration order.
    Skipped,
}

impl FieldMeta {
    /// Describe a leaf field bound to `name`.
    pub fn leaf(name: &'static str) -> Self {
        FieldMeta::Leaf { name }
    }

    /// Describe an embedded sub-structure with the given field layout.
    pub fn embedded(fields: Vec<FieldMeta>) -> Self {
        FieldMeta::Embedded { fields }
    }
}

/// A struct that can receive one result-set row.
///
/// `descriptors` lists the fields in declaration order; `put` writes one
/// decoded value through a [`FieldPath`] produced by the resolver. Both are
/// mechanical and are normally generated by [`impl_record!`](crate::impl_record).
pub trait Record: Default + Send + 'static {
    /// Field layout in declaration order, skipped fields included.
    fn descriptors() -> Vec<FieldMeta>;

    /// Write `value` into the leaf field located by `path`, descending
    /// through embedded sub-structures as needed.
    fn put(&mut self, path: &[usize], value: Value) -> Result<(), DecodeError>;
}

/// Conversion from a driver-decoded [`Value`] into a leaf field's type.
pub trait FromValue: Sized {
    /// Convert `value`, failing with [`DecodeError`] on shape or range
    /// mismatch.
    fn from_value(value: Value) -> Result<Self, DecodeError>;

    /// Replace `slot` with the converted value.
    fn assign(slot: &mut Self, value: Value) -> Result<(), DecodeError> {
        *slot = Self::from_value(value)?;
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &'static str, value: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        expected,
        found: kind_of(value),
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        value.as_i64().ok_or_else(|| mismatch("i64", &value))
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| DecodeError::OutOfRange {
            value: wide.to_string(),
            target: "i32",
        })
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let wide = u64::from_value(value)?;
        u32::try_from(wide).map_err(|_| DecodeError::OutOfRange {
            value: wide.to_string(),
            target: "u32",
        })
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        value.as_u64().ok_or_else(|| mismatch("u64", &value))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        value.as_f64().ok_or_else(|| mismatch("f64", &value))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let wide = f64::from_value(value)?;
        let narrowed = wide as f32;
        if !narrowed.is_finite() {
            return Err(DecodeError::OutOfRange {
                value: wide.to_string(),
                target: "f32",
            });
        }
        Ok(narrowed)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Implement [`Record`] for a struct from a declaration-order field list.
///
/// Each entry is `leaf name: Type`, optionally followed by `as "column"` to
/// override the bound column name, `embed name: Type` for a recursively
/// flattened sub-structure, or `skip name` for a field excluded from
/// resolution. The struct itself must implement `Default`.
///
/// ```
/// use rowbind::impl_record;
///
/// #[derive(Default)]
/// struct Address {
///     city: String,
///     zip: String,
/// }
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     display_name: String,
///     address: Address,
///     dirty: bool,
/// }
///
/// impl_record!(Address {
///     leaf city: String,
///     leaf zip: String,
/// });
///
/// impl_record!(User {
///     leaf id: i64,
///     leaf display_name: String as "name",
///     embed address: Address,
///     skip dirty,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $( $kind:ident $name:ident $(: $fty:ty)? $(as $col:literal)? ),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn descriptors() -> ::std::vec::Vec<$crate::record::FieldMeta> {
                ::std::vec![
                    $( $crate::__record_meta!($kind $name $(: $fty)? $(as $col)?) ),*
                ]
            }

            fn put(
                &mut self,
                path: &[usize],
                value: $crate::driver::Value,
            ) -> ::std::result::Result<(), $crate::error::DecodeError> {
                let (head, rest) = match path.split_first() {
                    ::std::option::Option::Some((head, rest)) => (*head, rest),
                    ::std::option::Option::None => {
                        return ::std::result::Result::Err(
                            $crate::error::DecodeError::EmptyFieldPath,
                        )
                    }
                };
                let _ = rest;
                let mut index = 0usize;
                $(
                    if head == index {
                        return $crate::__record_put!(self, head, rest, value, $kind $name);
                    }
                    index += 1;
                )*
                let _ = index;
                ::std::result::Result::Err($crate::error::DecodeError::NoField { index: head })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_meta {
    (leaf $name:ident : $fty:ty) => {
        $crate::record::FieldMeta::leaf(stringify!($name))
    };
    (leaf $name:ident : $fty:ty as $col:literal) => {
        $crate::record::FieldMeta::leaf($col)
    };
    (embed $name:ident : $fty:ty) => {
        $crate::record::FieldMeta::embedded(
            <$fty as $crate::record::Record>::descriptors(),
        )
    };
    (skip $name:ident $(: $fty:ty)?) => {
        $crate::record::FieldMeta::Skipped
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_put {
    ($self:ident, $head:ident, $rest:ident, $value:ident, leaf $name:ident) => {
        $crate::record::FromValue::assign(&mut $self.$name, $value)
    };
    ($self:ident, $head:ident, $rest:ident, $value:ident, embed $name:ident) => {
        $crate::record::Record::put(&mut $self.$name, $rest, $value)
    };
    ($self:ident, $head:ident, $rest:ident, $value:ident, skip $name:ident) => {
        ::std::result::Result::Err($crate::error::DecodeError::NoField { index: $head })
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Address {
        city: String,
        zip: String,
    }

    #[derive(Default)]
    struct User {
        id: i64,
        display_name: String,
        address: Address,
        dirty: bool,
    }

    crate::impl_record!(Address {
        leaf city: String,
        leaf zip: String,
    });

    crate::impl_record!(User {
        leaf id: i64,
        leaf display_name: String as "name",
        embed address: Address,
        skip dirty,
    });

    #[test]
    fn test_descriptors_follow_declaration_order() {
        let fields = User::descriptors();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], FieldMeta::leaf("id"));
        assert_eq!(fields[1], FieldMeta::leaf("name"));
        assert_eq!(
            fields[2],
            FieldMeta::embedded(vec![FieldMeta::leaf("city"), FieldMeta::leaf("zip")])
        );
        assert_eq!(fields[3], FieldMeta::Skipped);
    }

    #[test]
    fn test_put_leaf_field() {
        let mut user = User::default();
        user.put(&[0], json!(7)).unwrap();
        user.put(&[1], json!("Alice")).unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.display_name, "Alice");
    }

    #[test]
    fn test_put_descends_into_embedded_struct() {
        let mut user = User::default();
        user.put(&[2, 0], json!("Berlin")).unwrap();
        user.put(&[2, 1], json!("10115")).unwrap();

        assert_eq!(user.address.city, "Berlin");
        assert_eq!(user.address.zip, "10115");
    }

    #[test]
    fn test_put_rejects_bad_paths() {
        let mut user = User::default();

        let err = user.put(&[], json!(1)).unwrap_err();
        assert_eq!(err, DecodeError::EmptyFieldPath);

        let err = user.put(&[9], json!(1)).unwrap_err();
        assert_eq!(err, DecodeError::NoField { index: 9 });

        // Excluded fields never receive values.
        let err = user.put(&[3], json!(true)).unwrap_err();
        assert_eq!(err, DecodeError::NoField { index: 3 });
    }

    #[test]
    fn test_from_value_scalars() {
        assert_eq!(bool::from_value(json!(true)).unwrap(), true);
        assert_eq!(i64::from_value(json!(-9)).unwrap(), -9);
        assert_eq!(i32::from_value(json!(12)).unwrap(), 12);
        assert_eq!(u64::from_value(json!(5)).unwrap(), 5);
        assert_eq!(f64::from_value(json!(2.5)).unwrap(), 2.5);
        assert_eq!(f64::from_value(json!(3)).unwrap(), 3.0);
        assert_eq!(f32::from_value(json!(2.5)).unwrap(), 2.5f32);
        assert_eq!(String::from_value(json!("x")).unwrap(), "x");
    }

    #[test]
    fn test_from_value_option() {
        assert_eq!(Option::<i64>::from_value(json!(null)).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(json!(4)).unwrap(), Some(4));
    }

    #[test]
    fn test_from_value_type_mismatch() {
        let err = i64::from_value(json!("nope")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "i64",
                found: "string"
            }
        );

        let err = String::from_value(json!(null)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: "string",
                found: "null"
            }
        );
    }

    #[test]
    fn test_from_value_out_of_range() {
        let err = i32::from_value(json!(i64::MAX)).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { target: "i32", .. }));

        // Narrowing to f32 must not silently overflow to infinity.
        let err = f32::from_value(json!(1e308)).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { target: "f32", .. }));
    }
}
