//! Field metadata for records.
//!
//! Each record field may carry a `form` tag of the shape `<name>[,<flag>]*`:
//!
//! - `#[form = "name"]` renames the field on the wire.
//! - `#[form = "name,omitempty"]` skips the field when encoding an empty value.
//! - `#[form = "-"]` or `#[form = ",ignore"]` excludes the field entirely.
//! - `#[form = ",omitempty"]` leaves the external name empty: decoding reads the declared field
//!   name, encoding suppresses the field.
//!
//! Fields without a tag (or with an empty one) use their declared name verbatim.

use std::sync::OnceLock;
use tracing::trace;

const IGNORE: &str = "-";

/// Parsed metadata for one record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    field: &'static str,
    name: String,
    omit_empty: bool,
    ignore: bool,
}

impl Descriptor {
    /// Parses the `form` tag of the field declared as `field`.
    pub fn parse(field: &'static str, tag: Option<&str>) -> Self {
        let mut descriptor = Self {
            field,
            name: String::new(),
            omit_empty: false,
            ignore: false,
        };
        let tag = match tag {
            None | Some("") => {
                descriptor.name = field.to_string();
                return descriptor;
            }
            Some(IGNORE) => {
                descriptor.ignore = true;
                return descriptor;
            }
            Some(tag) => tag,
        };

        let mut parts = tag.split(',');
        match parts.next() {
            Some(IGNORE) => descriptor.ignore = true,
            Some(name) => descriptor.name = name.to_string(),
            None => {}
        }
        for flag in parts {
            match flag {
                "omitempty" => descriptor.omit_empty = true,
                "ignore" => descriptor.ignore = true,
                unknown => trace!(field, flag = unknown, "ignoring unknown form flag"),
            }
        }
        descriptor
    }

    /// The field name as declared on the record.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The external name (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether empty values are skipped when encoding.
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Whether the field is excluded from both directions.
    pub fn ignore(&self) -> bool {
        self.ignore
    }

    /// The key a field is written under, if it is written at all.
    pub(crate) fn encode_key(&self) -> Option<&str> {
        if self.ignore || self.name.is_empty() {
            return None;
        }
        Some(&self.name)
    }

    /// The key a field is read from, if it is read at all.
    pub(crate) fn decode_key(&self) -> Option<&str> {
        if self.ignore || self.name == IGNORE {
            return None;
        }
        if self.name.is_empty() {
            return Some(self.field);
        }
        Some(&self.name)
    }
}

/// Raw tags of a record type, parsed into [Descriptor]s on first use.
///
/// Generated code places one `Table` in a `static` per record type, which makes the parsed
/// descriptors a process-wide cache keyed by type.
pub struct Table {
    fields: &'static [(&'static str, Option<&'static str>)],
    parsed: OnceLock<Vec<Descriptor>>,
}

impl Table {
    /// Creates a table from `(declared name, tag)` pairs in declaration order.
    pub const fn new(fields: &'static [(&'static str, Option<&'static str>)]) -> Self {
        Self {
            fields,
            parsed: OnceLock::new(),
        }
    }

    /// Returns the descriptors, parsing the tags if this is the first call.
    pub fn descriptors(&self) -> &[Descriptor] {
        self.parsed.get_or_init(|| {
            let descriptors: Vec<_> = self
                .fields
                .iter()
                .map(|&(field, tag)| Descriptor::parse(field, tag))
                .collect();
            trace!(fields = descriptors.len(), "parsed form tags");
            descriptors
        })
    }
}

/// A type whose fields are described by `form` tags.
///
/// Implemented by `#[derive(Form)]` on structs with named fields.
pub trait Record {
    /// Field descriptors in declaration order.
    fn descriptors() -> &'static [Descriptor];
}

/// Returns the field descriptors of `T`.
pub fn descriptors_for<T: Record + ?Sized>() -> &'static [Descriptor] {
    T::descriptors()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn descriptor(name: &str, omit_empty: bool, ignore: bool) -> Descriptor {
        Descriptor {
            field: "Field",
            name: name.to_string(),
            omit_empty,
            ignore,
        }
    }

    #[test_case(None, descriptor("Field", false, false); "absent")]
    #[test_case(Some(""), descriptor("Field", false, false); "empty")]
    #[test_case(Some("-"), descriptor("", false, true); "dash")]
    #[test_case(Some("name"), descriptor("name", false, false); "name only")]
    #[test_case(Some("name,omitempty"), descriptor("name", true, false); "omitempty")]
    #[test_case(Some(",omitempty"), descriptor("", true, false); "empty name omitempty")]
    #[test_case(Some(",ignore"), descriptor("", false, true); "ignore flag")]
    #[test_case(Some("-,omitempty"), descriptor("", true, true); "dash with flag")]
    #[test_case(Some("name,future,omitempty"), descriptor("name", true, false); "unknown flag")]
    fn test_parse(tag: Option<&str>, expected: Descriptor) {
        assert_eq!(Descriptor::parse("Field", tag), expected);
    }

    #[test]
    fn test_keys() {
        let named = Descriptor::parse("Field", Some("name"));
        assert_eq!(named.encode_key(), Some("name"));
        assert_eq!(named.decode_key(), Some("name"));

        let unnamed = Descriptor::parse("Field", Some(",omitempty"));
        assert_eq!(unnamed.encode_key(), None);
        assert_eq!(unnamed.decode_key(), Some("Field"));

        let ignored = Descriptor::parse("Field", Some("-"));
        assert_eq!(ignored.encode_key(), None);
        assert_eq!(ignored.decode_key(), None);

        let flagged = Descriptor::parse("Field", Some("name,ignore"));
        assert_eq!(flagged.encode_key(), None);
        assert_eq!(flagged.decode_key(), None);
    }

    #[test]
    fn test_table_memoizes() {
        static TABLE: Table = Table::new(&[("id", Some("id")), ("name", None)]);
        let first = TABLE.descriptors();
        let second = TABLE.descriptors();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name(), "id");
        assert_eq!(first[1].name(), "name");
    }

    #[test]
    fn test_derived_descriptors() {
        #[allow(dead_code)]
        #[derive(crate::Form)]
        struct Login {
            #[form = "user"]
            user: String,
            #[form = "-"]
            token: String,
            remember: bool,
        }

        let descriptors = descriptors_for::<Login>();
        assert!(std::ptr::eq(descriptors, descriptors_for::<Login>()));
        assert_eq!(
            descriptors.iter().map(Descriptor::field).collect::<Vec<_>>(),
            ["user", "token", "remember"]
        );
        assert_eq!(descriptors[0].name(), "user");
        assert!(descriptors[1].ignore());
        assert_eq!(descriptors[2].name(), "remember");
    }
}
