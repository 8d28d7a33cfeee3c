//! Structural decoding of form payloads into existing values.

use crate::{
    escape::{self, Values},
    hooks, Config, Decode, Error, Key, Kind,
};
use bytes::Buf;
use tracing::{debug, trace};

/// Decodes an `application/x-www-form-urlencoded` payload into `out`, without limits.
///
/// See [decode_cfg].
pub fn decode<T: Decode>(buf: impl Buf, out: &mut T) -> Result<(), Error> {
    decode_cfg(buf, out, &Config::default())
}

/// Decodes an `application/x-www-form-urlencoded` payload into `out`.
///
/// Records and string-keyed maps read `key=value` pairs in any order; fields and entries
/// absent from the payload are left untouched. Sequences and scalars read `&`-separated
/// values without keys, and an empty payload leaves them untouched.
///
/// Sequence lengths survive a round trip except for a single empty element: `vec![""]`
/// encodes to an empty payload, which decodes as no elements.
///
/// On failure, `out` may have been partially updated.
///
/// # Example
///
/// ```
/// use webform_codec::{decode, Error};
///
/// let mut values = Vec::<String>::new();
/// decode(&b"a%26b&c%3Dd"[..], &mut values).unwrap();
/// assert_eq!(values, ["a&b", "c=d"]);
///
/// let mut number = 0u8;
/// assert!(matches!(decode(&b"256"[..], &mut number), Err(Error::ParseScalar { .. })));
/// ```
pub fn decode_cfg<T: Decode>(mut buf: impl Buf, out: &mut T, cfg: &Config) -> Result<(), Error> {
    let len = buf.remaining();
    if len > cfg.max_len() {
        debug!(len, max = cfg.max_len(), "payload too long");
        return Err(Error::LengthExceeded(len, cfg.max_len()));
    }
    let payload = buf.copy_to_bytes(len);
    let segments = payload
        .split(|&b| b == b'&')
        .filter(|segment| !segment.is_empty())
        .count();
    if segments > cfg.max_values() {
        debug!(segments, max = cfg.max_values(), "too many values");
        return Err(Error::TooManyValues(segments, cfg.max_values()));
    }
    trace!(len, kind = %out.kind(), "decoding");
    unmarshal(&payload, out)
}

/// Dispatches on the kind of `target` and decodes a whole payload into it.
fn unmarshal(payload: &[u8], target: &mut dyn Decode) -> Result<(), Error> {
    match target.kind() {
        Kind::Hooked => hooks::unmarshal(target, payload),
        Kind::Optional => {
            if payload.is_empty() {
                return Ok(());
            }
            let inner = populate(target)?;
            unmarshal(payload, inner)
        }
        Kind::Record => {
            let values = escape::decode_values(payload)?;
            decode_record(&values, target)
        }
        Kind::Mapping(Key::String) => {
            let values = escape::decode_values(payload)?;
            decode_mapping(values, target)
        }
        Kind::Mapping(Key::Unsupported(name)) => Err(Error::UnsupportedKeyType(name)),
        Kind::Sequence
        | Kind::Bool
        | Kind::Int(_)
        | Kind::Uint(_)
        | Kind::Float(_)
        | Kind::String => {
            if payload.is_empty() {
                return Ok(());
            }
            let tokens = escape::decode_tokens(payload)?;
            set(target, &tokens)
        }
    }
}

/// Assigns the values present in `values` to the fields of a record.
fn decode_record(values: &Values, record: &mut dyn Decode) -> Result<(), Error> {
    for (descriptor, field) in record.fields_mut() {
        let Some(key) = descriptor.decode_key() else {
            continue;
        };
        let Some(tokens) = values.get(key) else {
            continue;
        };
        set(field, tokens).map_err(|err| Error::field(key, err))?;
    }
    Ok(())
}

/// Stores every key of `values` in a string-keyed map.
fn decode_mapping(values: Values, mapping: &mut dyn Decode) -> Result<(), Error> {
    let name = mapping.type_name();
    for (key, tokens) in values {
        let entry = mapping
            .entry_mut(&key)
            .ok_or(Error::UnsupportedKeyType(name))?;
        set(entry, &tokens).map_err(|err| Error::entry(&key, err))?;
    }
    Ok(())
}

/// Assigns the values of one key (or of a keyless payload) to `target`.
fn set(target: &mut dyn Decode, tokens: &[String]) -> Result<(), Error> {
    match target.kind() {
        Kind::Optional => set(populate(target)?, tokens),
        Kind::Sequence => {
            let elements = target.resize(tokens.len());
            for (index, (element, token)) in elements.into_iter().zip(tokens).enumerate() {
                set_element(element, token).map_err(|err| Error::element(index, err))?;
            }
            Ok(())
        }
        _ if tokens.is_empty() => Ok(()),
        Kind::Record | Kind::Mapping(_) => unmarshal(tokens[0].as_bytes(), target),
        Kind::Hooked
        | Kind::Bool
        | Kind::Int(_)
        | Kind::Uint(_)
        | Kind::Float(_)
        | Kind::String => set_element(target, &tokens[0]),
    }
}

/// Assigns a single value to a scalar, hooked value or sequence element.
fn set_element(target: &mut dyn Decode, token: &str) -> Result<(), Error> {
    match target.kind() {
        Kind::Hooked => hooks::unmarshal(target, token.as_bytes()),
        Kind::Optional => set_element(populate(target)?, token),
        Kind::Sequence | Kind::Record | Kind::Mapping(_) => {
            Err(Error::UnsupportedType(target.type_name()))
        }
        Kind::Bool | Kind::Int(_) | Kind::Uint(_) | Kind::Float(_) | Kind::String => {
            target.parse_scalar(token)
        }
    }
}

/// Populates an optional and returns its pointee.
fn populate(target: &mut dyn Decode) -> Result<&mut dyn Decode, Error> {
    let name = target.type_name();
    target.optional_mut().ok_or(Error::UnsupportedType(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_length_exceeded() {
        let cfg = Config::new().with_max_len(3);
        let mut value = String::new();
        decode_cfg(&b"abc"[..], &mut value, &cfg).unwrap();
        assert_eq!(value, "abc");
        assert!(matches!(
            decode_cfg(&b"abcd"[..], &mut value, &cfg),
            Err(Error::LengthExceeded(4, 3))
        ));
    }

    #[test]
    fn test_too_many_values() {
        let cfg = Config::new().with_max_values(2);
        let mut values = BTreeMap::<String, u8>::new();
        decode_cfg(&b"a=1&&b=2&"[..], &mut values, &cfg).unwrap();
        assert_eq!(values.len(), 2);
        assert!(matches!(
            decode_cfg(&b"a=1&b=2&c=3"[..], &mut values, &cfg),
            Err(Error::TooManyValues(3, 2))
        ));
    }

    #[test]
    fn test_invalid_payload() {
        let mut value = String::new();
        assert!(matches!(
            decode(&b"%zz"[..], &mut value),
            Err(Error::InvalidPayload(escape::Error::InvalidEscape(_)))
        ));

        let mut values = BTreeMap::<String, String>::new();
        assert!(matches!(
            decode(&b"a=%"[..], &mut values),
            Err(Error::InvalidPayload(escape::Error::InvalidEscape(_)))
        ));
    }

    #[test]
    fn test_optional_pointee() {
        let mut value: Option<Vec<u8>> = None;
        decode(&b"1&2"[..], &mut value).unwrap();
        assert_eq!(value, Some(vec![1, 2]));

        let mut value: Option<BTreeMap<String, u8>> = None;
        decode(&b"a=1"[..], &mut value).unwrap();
        assert_eq!(value.unwrap()["a"], 1);
    }

    #[test]
    fn test_first_token_wins() {
        let mut values = BTreeMap::<String, u8>::new();
        decode(&b"a=1&a=2"[..], &mut values).unwrap();
        assert_eq!(values["a"], 1);
    }

    #[test]
    fn test_nested_sequence_element() {
        let mut values = BTreeMap::<String, Vec<Vec<u8>>>::new();
        let err = decode(&b"a=1"[..], &mut values).unwrap_err();
        assert!(matches!(err, Error::Entry { ref key, .. } if key == "a"));
        assert!(matches!(err.root(), Error::UnsupportedType(_)));
    }
}
