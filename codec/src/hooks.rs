//! User-defined encode/decode overrides.
//!
//! A type opts into custom handling by implementing [Marshaler] and/or [Unmarshaler] and
//! declaring itself hooked with `#[derive(Form)]` and `#[form(hook)]` (or `#[form(marshal)]`,
//! `#[form(unmarshal)]` for a single direction). Hooked types are never reflected
//! structurally: the hook sees (and produces) the raw bytes of the value.
//!
//! ```
//! use webform_codec::{decode, encode, BoxError, Form, Marshaler, Unmarshaler};
//!
//! #[derive(Debug, Default, PartialEq, Form)]
//! #[form(hook)]
//! struct Celsius(i32);
//!
//! impl Marshaler for Celsius {
//!     fn marshal_form(&self) -> Result<Vec<u8>, BoxError> {
//!         Ok(format!("{}C", self.0).into_bytes())
//!     }
//! }
//!
//! impl Unmarshaler for Celsius {
//!     fn unmarshal_form(&mut self, data: &[u8]) -> Result<(), BoxError> {
//!         let text = std::str::from_utf8(data)?;
//!         self.0 = text.trim_end_matches('C').parse()?;
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Debug, Default, PartialEq, Form)]
//! struct Reading {
//!     #[form = "temp"]
//!     temp: Celsius,
//! }
//!
//! let encoded = encode(&Reading { temp: Celsius(21) }).unwrap();
//! assert_eq!(&encoded[..], b"temp=21C");
//!
//! let mut decoded = Reading::default();
//! decode(&encoded[..], &mut decoded).unwrap();
//! assert_eq!(decoded, Reading { temp: Celsius(21) });
//! ```

use crate::{escape, BoxError, Decode, Encode, Error};

/// A type that can marshal itself into form bytes.
pub trait Marshaler {
    /// Returns the encoded form of `self`.
    fn marshal_form(&self) -> Result<Vec<u8>, BoxError>;
}

/// A type that can unmarshal a form description of itself.
///
/// The input is a single value (or, at the top level, the whole payload). Implementations
/// must copy what they wish to retain.
pub trait Unmarshaler {
    /// Replaces `self` with the value described by `data`.
    fn unmarshal_form(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Invokes the encode hook of `value`.
pub(crate) fn marshal(value: &dyn Encode) -> Result<String, Error> {
    let marshaler = value
        .marshaler()
        .ok_or(Error::UnsupportedType(value.type_name()))?;
    let bytes = marshaler.marshal_form().map_err(Error::HookFailure)?;
    String::from_utf8(bytes).map_err(|err| Error::HookFailure(Box::new(err)))
}

/// Invokes the decode hook of `target`.
pub(crate) fn unmarshal(target: &mut dyn Decode, data: &[u8]) -> Result<(), Error> {
    let name = target.type_name();
    let unmarshaler = target.unmarshaler().ok_or(Error::UnsupportedType(name))?;
    unmarshaler.unmarshal_form(data).map_err(Error::HookFailure)
}

/// Re-encodes hook output so its pairs are in canonical order.
pub(crate) fn canonicalize(raw: &str) -> Result<String, Error> {
    let values = escape::decode_values(raw.as_bytes())?;
    Ok(escape::encode_values(&values))
}
