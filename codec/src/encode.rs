//! Structural encoding of values into form payloads.

use crate::{
    escape::{self, Values},
    hooks, Encode, Error, Key, Kind,
};
use bytes::Bytes;
use tracing::{debug, trace};

/// Encodes `value` into an `application/x-www-form-urlencoded` payload.
///
/// Records and string-keyed maps produce `key=value` pairs with keys in ascending order.
/// Sequences and scalars produce their escaped values joined by `&`, without keys. An
/// unpopulated optional produces an empty payload.
///
/// # Example
///
/// ```
/// use webform_codec::encode;
///
/// assert_eq!(&encode(&"hello & world?").unwrap()[..], b"hello+%26+world%3F");
/// assert_eq!(&encode(&["a&b", "c=d"]).unwrap()[..], b"a%26b&c%3Dd");
/// ```
pub fn encode<T: Encode>(value: &T) -> Result<Bytes, Error> {
    trace!(kind = %value.kind(), "encoding");
    marshal(value).map(Bytes::from)
}

/// Dispatches on the kind of `value` and returns the escaped payload.
pub(crate) fn marshal(value: &dyn Encode) -> Result<String, Error> {
    match value.kind() {
        Kind::Optional => match value.optional() {
            Some(inner) => marshal(inner),
            None => Ok(String::new()),
        },
        Kind::Hooked => hooks::canonicalize(&hooks::marshal(value)?),
        Kind::Record => Ok(escape::encode_values(&record_values(value)?)),
        Kind::Mapping(Key::String) => Ok(escape::encode_values(&mapping_values(value)?)),
        Kind::Mapping(Key::Unsupported(name)) => Err(Error::UnsupportedKeyType(name)),
        Kind::Sequence
        | Kind::Bool
        | Kind::Int(_)
        | Kind::Uint(_)
        | Kind::Float(_)
        | Kind::String => {
            let escaped: Vec<_> = get_values(value)?
                .iter()
                .map(|value| escape::escape(value))
                .collect();
            Ok(escaped.join("&"))
        }
    }
}

/// Collects the values of every written field of a record.
///
/// Fields sharing an external name do not merge: the last written one replaces the others.
fn record_values(record: &dyn Encode) -> Result<Values, Error> {
    let mut values = Values::new();
    for (descriptor, field) in record.fields() {
        let Some(key) = descriptor.encode_key() else {
            continue;
        };
        if descriptor.omit_empty() && field.is_empty_value() {
            continue;
        }
        let field_values = match get_values(field) {
            Ok(field_values) => field_values,
            Err(err) => match err.root() {
                Error::UnsupportedType(name) => {
                    debug!(field = descriptor.field(), ty = name, "skipping unsupported field");
                    continue;
                }
                _ => return Err(Error::field(key, err)),
            },
        };
        if field_values.is_empty() {
            continue;
        }
        values.insert(key.to_string(), field_values);
    }
    Ok(values)
}

/// Collects the values of every non-empty entry of a string-keyed map.
fn mapping_values(mapping: &dyn Encode) -> Result<Values, Error> {
    let mut values = Values::new();
    for (key, entry) in mapping.entries() {
        if entry.is_empty_value() {
            continue;
        }
        let entry_values = match get_values(entry) {
            Ok(entry_values) => entry_values,
            Err(err) => match err.root() {
                Error::UnsupportedType(name) => {
                    debug!(key, ty = name, "skipping unsupported entry");
                    continue;
                }
                _ => return Err(Error::entry(key, err)),
            },
        };
        if entry_values.is_empty() {
            continue;
        }
        values.insert(key.to_string(), entry_values);
    }
    Ok(values)
}

/// Returns the unescaped wire values of a field, map entry or top-level scalar.
fn get_values(value: &dyn Encode) -> Result<Vec<String>, Error> {
    match value.kind() {
        Kind::Optional => match value.optional() {
            Some(inner) => get_values(inner),
            None => Ok(Vec::new()),
        },
        Kind::Sequence => value
            .elements()
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                get_scalar_or_hook(element).map_err(|err| Error::element(index, err))
            })
            .collect(),
        Kind::Hooked => Ok(vec![hooks::marshal(value)?]),
        Kind::Record | Kind::Mapping(_) => Ok(vec![marshal(value)?]),
        Kind::Bool | Kind::Int(_) | Kind::Uint(_) | Kind::Float(_) | Kind::String => {
            Ok(vec![stringify(value)?])
        }
    }
}

/// Returns the wire value of a sequence element.
fn get_scalar_or_hook(element: &dyn Encode) -> Result<String, Error> {
    match element.kind() {
        Kind::Hooked => hooks::marshal(element),
        Kind::Optional => match element.optional() {
            Some(inner) => get_scalar_or_hook(inner),
            None => Ok(String::new()),
        },
        Kind::Sequence | Kind::Mapping(_) | Kind::Record => {
            Err(Error::UnsupportedType(element.type_name()))
        }
        Kind::Bool | Kind::Int(_) | Kind::Uint(_) | Kind::Float(_) | Kind::String => {
            stringify(element)
        }
    }
}

fn stringify(value: &dyn Encode) -> Result<String, Error> {
    value
        .scalar()
        .ok_or_else(|| Error::UnsupportedType(value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxError, Form, Marshaler};
    use std::collections::BTreeMap;

    struct Broken;

    impl Form for Broken {
        fn kind(&self) -> Kind {
            Kind::Hooked
        }
    }

    impl Encode for Broken {
        fn marshaler(&self) -> Option<&dyn Marshaler> {
            Some(self)
        }
    }

    impl Marshaler for Broken {
        fn marshal_form(&self) -> Result<Vec<u8>, BoxError> {
            Err("broken".into())
        }
    }

    struct NotUtf8;

    impl Form for NotUtf8 {
        fn kind(&self) -> Kind {
            Kind::Hooked
        }
    }

    impl Encode for NotUtf8 {
        fn marshaler(&self) -> Option<&dyn Marshaler> {
            Some(self)
        }
    }

    impl Marshaler for NotUtf8 {
        fn marshal_form(&self) -> Result<Vec<u8>, BoxError> {
            Ok(vec![0xff])
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(&encode(&true).unwrap()[..], b"true");
        assert_eq!(&encode(&-42).unwrap()[..], b"-42");
        assert_eq!(&encode(&"hello & world?").unwrap()[..], b"hello+%26+world%3F");
    }

    #[test]
    fn test_nested_optional() {
        assert_eq!(&encode(&Some(Some(1))).unwrap()[..], b"1");
        assert_eq!(&encode(&Some(None::<u8>)).unwrap()[..], b"");
    }

    #[test]
    fn test_hook_failure() {
        assert!(matches!(encode(&Broken), Err(Error::HookFailure(_))));
        assert!(matches!(encode(&NotUtf8), Err(Error::HookFailure(_))));
    }

    #[test]
    fn test_hook_failure_in_entry() {
        let value = BTreeMap::from([("x".to_string(), Broken)]);
        let err = encode(&value).unwrap_err();
        assert!(matches!(err, Error::Entry { ref key, .. } if key == "x"));
        assert!(matches!(err.root(), Error::HookFailure(_)));
    }

    #[test]
    fn test_hook_failure_in_element() {
        let err = encode(&[Broken]).unwrap_err();
        assert!(matches!(err, Error::Element { index: 0, .. }));
    }

    #[test]
    fn test_unsupported_entry_skipped() {
        let value = BTreeMap::from([
            ("a".to_string(), vec![vec![1]]),
            ("b".to_string(), vec![vec![2]]),
        ]);
        assert_eq!(&encode(&value).unwrap()[..], b"");
    }
}
