//! Query escaping and the `key=value&...` grammar.
//!
//! Tokens are escaped with the query-component rules: unreserved characters
//! (`A-Z a-z 0-9 - _ . ~`) pass through, space becomes `+`, and every other byte of the
//! UTF-8 encoding becomes `%HH` with uppercase hex digits. Decoding accepts both `+` and
//! `%20` for space.

use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;
use thiserror::Error;

/// Bytes that are escaped inside a query component (everything but the unreserved set).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Mapping from key to its ordered values.
///
/// Keys iterate in ascending byte order, which is the canonical order of an encoded payload.
pub type Values = BTreeMap<String, Vec<String>>;

/// Error type for escape operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
    #[error("invalid UTF-8 in {0:?}")]
    InvalidUtf8(String),
}

/// Escapes `s` so it can be placed in a query component.
///
/// ```
/// use webform_codec::escape::escape;
///
/// assert_eq!(escape("hello & world?"), "hello+%26+world%3F");
/// ```
pub fn escape(s: &str) -> String {
    s.split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Reverses [escape].
pub fn unescape(s: &str) -> Result<String, Error> {
    unescape_bytes(s.as_bytes())
}

fn unescape_bytes(raw: &[u8]) -> Result<String, Error> {
    validate(raw)?;
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    let decoded: Vec<u8> = percent_decode(&spaced).collect();
    String::from_utf8(decoded).map_err(|_| Error::InvalidUtf8(lossy(raw)))
}

// `percent_decode` passes malformed sequences through untouched, so reject them first.
fn validate(raw: &[u8]) -> Result<(), Error> {
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'%' {
            i += 1;
            continue;
        }
        let escape = &raw[i..raw.len().min(i + 3)];
        if escape.len() < 3 || !escape[1..].iter().all(u8::is_ascii_hexdigit) {
            return Err(Error::InvalidEscape(lossy(escape)));
        }
        i += 3;
    }
    Ok(())
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Encodes `values` as `key=value` pairs joined by `&`, sorted by key.
///
/// Values of one key keep their order and each repeats the key.
pub fn encode_values(values: &Values) -> String {
    let mut out = String::new();
    for (key, vals) in values {
        let key = escape(key);
        for val in vals {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&key);
            out.push('=');
            out.push_str(&escape(val));
        }
    }
    out
}

/// Parses a payload into its [Values].
///
/// Pairs may appear in any order. A key without `=` has a single empty value and empty
/// segments (such as a trailing `&`) are skipped.
pub fn decode_values(payload: &[u8]) -> Result<Values, Error> {
    let mut values = Values::new();
    for pair in payload.split(|&b| b == b'&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.iter().position(|&b| b == b'=') {
            Some(at) => (&pair[..at], &pair[at + 1..]),
            None => (pair, &[][..]),
        };
        let key = unescape_bytes(key)?;
        let value = unescape_bytes(value)?;
        values.entry(key).or_default().push(value);
    }
    Ok(values)
}

/// Splits a keyless payload on `&` and unescapes each token.
///
/// An empty payload has no tokens.
pub(crate) fn decode_tokens(payload: &[u8]) -> Result<Vec<String>, Error> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    payload.split(|&b| b == b'&').map(unescape_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("hello world", "hello+world"; "space")]
    #[test_case("hello & world?", "hello+%26+world%3F"; "reserved")]
    #[test_case("a-b_c.d~e", "a-b_c.d~e"; "unreserved")]
    #[test_case("a*b/c", "a%2Ab%2Fc"; "star and slash")]
    #[test_case("é", "%C3%A9"; "multibyte")]
    #[test_case("", ""; "empty")]
    fn test_escape(input: &str, expected: &str) {
        assert_eq!(escape(input), expected);
        assert_eq!(unescape(expected).unwrap(), input);
    }

    #[test]
    fn test_unescape_space_forms() {
        assert_eq!(unescape("a+b%20c").unwrap(), "a b c");
        assert_eq!(unescape("%2b").unwrap(), "+");
    }

    #[test_case("%"; "bare percent")]
    #[test_case("%4"; "truncated")]
    #[test_case("%zz"; "not hex")]
    #[test_case("%%%"; "repeated")]
    fn test_unescape_invalid(input: &str) {
        assert!(matches!(unescape(input), Err(Error::InvalidEscape(_))));
    }

    #[test]
    fn test_unescape_invalid_utf8() {
        assert!(matches!(unescape("%FF"), Err(Error::InvalidUtf8(_))));
    }

    #[test]
    fn test_encode_values_sorted() {
        let mut values = Values::new();
        values.insert("name".into(), vec!["john".into()]);
        values.insert("aliases".into(), vec!["johnny".into(), "jonny".into()]);
        values.insert("age".into(), vec!["20".into()]);
        values.insert("empty".into(), vec![String::new()]);
        assert_eq!(
            encode_values(&values),
            "age=20&aliases=johnny&aliases=jonny&empty=&name=john"
        );
    }

    #[test]
    fn test_encode_values_escapes_keys() {
        let mut values = Values::new();
        values.insert("a b".into(), vec!["c&d".into()]);
        assert_eq!(encode_values(&values), "a+b=c%26d");
        assert_eq!(encode_values(&Values::new()), "");
    }

    #[test]
    fn test_decode_values() {
        let values = decode_values(b"name=john&aliases=johnny&age=20&aliases=jonny").unwrap();
        assert_eq!(values["name"], ["john"]);
        assert_eq!(values["aliases"], ["johnny", "jonny"]);
        assert_eq!(values["age"], ["20"]);
    }

    #[test]
    fn test_decode_values_lenient() {
        let values = decode_values(b"flag&a=1&&b=&").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values["flag"], [""]);
        assert_eq!(values["a"], ["1"]);
        assert_eq!(values["b"], [""]);
        assert!(decode_values(b"").unwrap().is_empty());
    }

    #[test]
    fn test_decode_values_value_keeps_equals() {
        let values = decode_values(b"expr=a%3Db=c").unwrap();
        assert_eq!(values["expr"], ["a=b=c"]);
    }

    #[test]
    fn test_decode_values_invalid() {
        assert!(matches!(
            decode_values(b"%%%"),
            Err(Error::InvalidEscape(_))
        ));
        assert!(matches!(
            decode_values(b"ok=1&bad=%G0"),
            Err(Error::InvalidEscape(_))
        ));
    }

    #[test]
    fn test_decode_tokens() {
        assert!(decode_tokens(b"").unwrap().is_empty());
        assert_eq!(
            decode_tokens(b"a%26b&c%3Dd&e%3Ff").unwrap(),
            ["a&b", "c=d", "e?f"]
        );
        assert_eq!(decode_tokens(b"hello+%26+world%3F").unwrap(), ["hello & world?"]);
    }

    #[test]
    fn test_canonical_order_is_stable() {
        let payload = b"b=2&a=1&c=3&a=0";
        let once = encode_values(&decode_values(payload).unwrap());
        let twice = encode_values(&decode_values(once.as_bytes()).unwrap());
        assert_eq!(once, "a=1&a=0&b=2&c=3");
        assert_eq!(once, twice);
    }
}
