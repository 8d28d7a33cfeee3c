//! Codec implementations for Rust primitive types.
//!
//! # Wire literals
//!
//! * Integers are written in base 10 and parsed with overflow checks at their declared width.
//! * Floats are written as the shortest decimal that round-trips at their width, never with
//!   an exponent. Parsing accepts an optional exponent.
//! * Booleans are written as `true`/`false` and parsed from `1 t T true TRUE True` or
//!   `0 f F false FALSE False`.
//! * Strings are written verbatim (escaping happens when the payload is assembled).

use crate::{Decode, Encode, Error, Form, Kind, Width};
use thiserror::Error;

/// Error returned for a boolean literal outside the accepted set.
#[derive(Error, Debug)]
#[error("invalid syntax")]
pub struct InvalidBool;

fn parse_error(
    kind: Kind,
    literal: &str,
    cause: impl std::error::Error + Send + Sync + 'static,
) -> Error {
    Error::ParseScalar {
        kind,
        literal: literal.to_string(),
        cause: Box::new(cause),
    }
}

// Numeric types implementation
macro_rules! impl_numeric {
    ($type:ty, $kind:expr, |$value:ident| $empty:expr) => {
        impl Form for $type {
            #[inline]
            fn kind(&self) -> Kind {
                $kind
            }
        }

        impl Encode for $type {
            #[inline]
            fn is_empty_value(&self) -> bool {
                let $value = *self;
                $empty
            }

            #[inline]
            fn scalar(&self) -> Option<String> {
                Some(self.to_string())
            }
        }

        impl Decode for $type {
            #[inline]
            fn parse_scalar(&mut self, literal: &str) -> Result<(), Error> {
                *self = literal
                    .parse::<$type>()
                    .map_err(|err| parse_error($kind, literal, err))?;
                Ok(())
            }
        }
    };
}

impl_numeric!(u8, Kind::Uint(Width::W8), |value| value == 0);
impl_numeric!(u16, Kind::Uint(Width::W16), |value| value == 0);
impl_numeric!(u32, Kind::Uint(Width::W32), |value| value == 0);
impl_numeric!(u64, Kind::Uint(Width::W64), |value| value == 0);
impl_numeric!(u128, Kind::Uint(Width::W128), |value| value == 0);
impl_numeric!(usize, Kind::Uint(Width::Native), |value| value == 0);
impl_numeric!(i8, Kind::Int(Width::W8), |value| value == 0);
impl_numeric!(i16, Kind::Int(Width::W16), |value| value == 0);
impl_numeric!(i32, Kind::Int(Width::W32), |value| value == 0);
impl_numeric!(i64, Kind::Int(Width::W64), |value| value == 0);
impl_numeric!(i128, Kind::Int(Width::W128), |value| value == 0);
impl_numeric!(isize, Kind::Int(Width::Native), |value| value == 0);
// Negative zero is not empty.
impl_numeric!(f32, Kind::Float(Width::W32), |value| value.to_bits() == 0);
impl_numeric!(f64, Kind::Float(Width::W64), |value| value.to_bits() == 0);

// Bool implementation
impl Form for bool {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Bool
    }
}

impl Encode for bool {
    #[inline]
    fn is_empty_value(&self) -> bool {
        !*self
    }

    #[inline]
    fn scalar(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl Decode for bool {
    fn parse_scalar(&mut self, literal: &str) -> Result<(), Error> {
        *self = match literal {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
            "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
            _ => return Err(parse_error(Kind::Bool, literal, InvalidBool)),
        };
        Ok(())
    }
}

// String implementation
impl Form for String {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::String
    }
}

impl Encode for String {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn scalar(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl Decode for String {
    #[inline]
    fn parse_scalar(&mut self, literal: &str) -> Result<(), Error> {
        literal.clone_into(self);
        Ok(())
    }
}

impl Form for str {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::String
    }
}

impl Encode for str {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn scalar(&self) -> Option<String> {
        Some(self.to_string())
    }
}

// Option implementation
impl<T: Form> Form for Option<T> {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Optional
    }
}

impl<T: Encode> Encode for Option<T> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    #[inline]
    fn optional(&self) -> Option<&dyn Encode> {
        self.as_ref().map(|inner| inner as &dyn Encode)
    }
}

impl<T: Decode + Default> Decode for Option<T> {
    #[inline]
    fn optional_mut(&mut self) -> Option<&mut dyn Decode> {
        Some(self.get_or_insert_with(T::default))
    }
}
