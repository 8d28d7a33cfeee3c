//! Codec implementations for maps.
//!
//! Only string-keyed maps have a wire form: each entry becomes one key whose values are those
//! of the map value (so `HashMap<String, Vec<String>>` round-trips repeated keys). Maps with
//! other key types report [Key::Unsupported] and fail with
//! [Error::UnsupportedKeyType](crate::Error::UnsupportedKeyType) in both directions.

use crate::{Decode, Encode, Form, Key, Kind};
use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

/// Trait for types usable as map keys.
pub trait MapKey: Sized {
    /// Whether keys of this type can be written as strings.
    const KEY: Key;

    /// Returns the key as a string.
    fn as_key(&self) -> Option<&str>;

    /// Builds a key from its string form.
    fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
    const KEY: Key = Key::String;

    #[inline]
    fn as_key(&self) -> Option<&str> {
        Some(self)
    }

    #[inline]
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }
}

macro_rules! impl_unsupported_key {
    ($($type:ty),*) => {
        $(
            impl MapKey for $type {
                const KEY: Key = Key::Unsupported(stringify!($type));

                #[inline]
                fn as_key(&self) -> Option<&str> {
                    None
                }

                #[inline]
                fn from_key(_: &str) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

impl_unsupported_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char);

// HashMap implementation
impl<K: MapKey, V: Form, S> Form for HashMap<K, V, S> {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Mapping(K::KEY)
    }
}

impl<K: MapKey, V: Encode, S> Encode for HashMap<K, V, S> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn entries(&self) -> Vec<(&str, &dyn Encode)> {
        self.iter()
            .filter_map(|(key, value)| Some((key.as_key()?, value as &dyn Encode)))
            .collect()
    }
}

impl<K: MapKey + Eq + Hash, V: Decode + Default, S: BuildHasher> Decode for HashMap<K, V, S> {
    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let slot = self.entry(K::from_key(key)?).or_default();
        *slot = V::default();
        Some(slot)
    }
}

// BTreeMap implementation
impl<K: MapKey, V: Form> Form for BTreeMap<K, V> {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Mapping(K::KEY)
    }
}

impl<K: MapKey, V: Encode> Encode for BTreeMap<K, V> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn entries(&self) -> Vec<(&str, &dyn Encode)> {
        self.iter()
            .filter_map(|(key, value)| Some((key.as_key()?, value as &dyn Encode)))
            .collect()
    }
}

impl<K: MapKey + Ord, V: Decode + Default> Decode for BTreeMap<K, V> {
    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let slot = self.entry(K::from_key(key)?).or_default();
        *slot = V::default();
        Some(slot)
    }
}
