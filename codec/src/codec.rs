//! Core codec traits and implementations
//!
//! The structural codec never inspects concrete types. Instead, every supported type reports
//! its [Kind] and exposes the pieces the codec needs for that kind (a scalar literal, the
//! pointee of an optional, the elements of a sequence, the entries of a map, the fields of a
//! record, or a hook) through the object-safe [Encode] and [Decode] traits.

use crate::{
    hooks::{Marshaler, Unmarshaler},
    tags::Descriptor,
    Error,
};
use std::fmt;

/// Bit width of a numeric scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
    W128,
    /// Pointer-sized (`isize`/`usize`).
    Native,
}

impl Width {
    /// Returns the number of bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
            Self::W128 => 128,
            Self::Native => usize::BITS,
        }
    }
}

/// Key type of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    String,
    /// Any non-string key, named by its type.
    Unsupported(&'static str),
}

/// Discriminator used for structural dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int(Width),
    Uint(Width),
    Float(Width),
    String,
    /// A value that may be absent (`Option<T>`).
    Optional,
    Sequence,
    Mapping(Key),
    Record,
    /// A type with a user-defined hook, which takes precedence over any other shape.
    Hooked,
}

impl Kind {
    /// Returns true for booleans, numbers and strings.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int(_) | Self::Uint(_) | Self::Float(_) | Self::String
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(Width::Native) => f.write_str("isize"),
            Self::Int(width) => write!(f, "i{}", width.bits()),
            Self::Uint(Width::Native) => f.write_str("usize"),
            Self::Uint(width) => write!(f, "u{}", width.bits()),
            Self::Float(width) => write!(f, "f{}", width.bits()),
            Self::String => f.write_str("string"),
            Self::Optional => f.write_str("optional"),
            Self::Sequence => f.write_str("sequence"),
            Self::Mapping(_) => f.write_str("mapping"),
            Self::Record => f.write_str("record"),
            Self::Hooked => f.write_str("hooked"),
        }
    }
}

/// Trait for all types the codec understands.
pub trait Form {
    /// Returns the kind used to dispatch on this value.
    fn kind(&self) -> Kind;

    /// Returns the name of the concrete type, for error reporting.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Trait for types that can be encoded.
///
/// Each accessor is only consulted when [Form::kind] reports the matching kind; the defaults
/// describe a value that has none of these shapes.
pub trait Encode: Form {
    /// Returns true if the value is empty, as used by the `omitempty` flag.
    fn is_empty_value(&self) -> bool {
        false
    }

    /// Returns the wire literal of a scalar.
    fn scalar(&self) -> Option<String> {
        None
    }

    /// Returns the pointee of a populated optional.
    fn optional(&self) -> Option<&dyn Encode> {
        None
    }

    /// Returns the elements of a sequence, in order.
    fn elements(&self) -> Vec<&dyn Encode> {
        Vec::new()
    }

    /// Returns the entries of a string-keyed map.
    fn entries(&self) -> Vec<(&str, &dyn Encode)> {
        Vec::new()
    }

    /// Returns the fields of a record, paired with their descriptors, in declaration order.
    ///
    /// Ignored fields are left out.
    fn fields(&self) -> Vec<(&'static Descriptor, &dyn Encode)> {
        Vec::new()
    }

    /// Returns the encode hook of a hooked type.
    fn marshaler(&self) -> Option<&dyn Marshaler> {
        None
    }
}

/// Trait for types that can be decoded in place.
///
/// As with [Encode], each accessor is only consulted for the matching [Kind].
pub trait Decode: Form {
    /// Replaces a scalar with the value parsed from `literal`.
    fn parse_scalar(&mut self, literal: &str) -> Result<(), Error> {
        let _ = literal;
        Err(Error::UnsupportedType(self.type_name()))
    }

    /// Populates an optional (if it is not already) and returns its pointee.
    fn optional_mut(&mut self) -> Option<&mut dyn Decode> {
        None
    }

    /// Replaces a sequence with `len` default elements and returns them, in order.
    fn resize(&mut self, len: usize) -> Vec<&mut dyn Decode> {
        let _ = len;
        Vec::new()
    }

    /// Stores a fresh default value under `key` in a map and returns it.
    ///
    /// Returns `None` if the map cannot hold string keys.
    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let _ = key;
        None
    }

    /// Returns the fields of a record, paired with their descriptors, in declaration order.
    ///
    /// Ignored fields are left out.
    fn fields_mut(&mut self) -> Vec<(&'static Descriptor, &mut dyn Decode)> {
        Vec::new()
    }

    /// Returns the decode hook of a hooked type.
    fn unmarshaler(&mut self) -> Option<&mut dyn Unmarshaler> {
        None
    }
}
