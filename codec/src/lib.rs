//! Encode and decode structured data as `application/x-www-form-urlencoded` payloads.
//!
//! # Overview
//!
//! A schema-directed form codec designed to:
//! - Serialize records, maps, sequences and scalars into canonical form payloads
//! - Deserialize untrusted form payloads into existing values, in place
//!
//! # Supported Types
//!
//! Natively supports:
//! - Scalars: `bool`, `u8`..`u128`, `usize`, `i8`..`i128`, `isize`, `f32`, `f64`, `String`, `&str`
//! - Collections: `Option<T>`, `Vec<T>`, slices and arrays, `HashMap<String, V>`, `BTreeMap<String, V>`
//! - Pointers: `&T`, `&mut T`, `Box<T>`, `Rc<T>`, `Arc<T>` (transparent)
//!
//! Structs with named fields become records with `#[derive(Form)]`. Each field is written
//! under its declared name unless a `#[form = "..."]` tag says otherwise:
//!
//! - `#[form = "name"]` renames the field.
//! - `#[form = "name,omitempty"]` skips the field on encode when it is empty.
//! - `#[form = "-"]` (or the `ignore` flag) skips the field in both directions.
//!
//! Types with their own wire form implement [Marshaler] and [Unmarshaler] and are declared
//! with `#[derive(Form)]` and `#[form(hook)]` (see [hooks]).
//!
//! # Example
//!
//! ```
//! use webform_codec::{decode, encode, Form};
//!
//! #[derive(Debug, Default, PartialEq, Form)]
//! struct Profile {
//!     #[form = "name"]
//!     name: String,
//!     #[form = "aliases,omitempty"]
//!     aliases: Vec<String>,
//!     #[form = "age"]
//!     age: u8,
//!     #[form = "-"]
//!     session: String,
//! }
//!
//! let profile = Profile {
//!     name: "john".into(),
//!     aliases: vec!["johnny".into(), "jonny".into()],
//!     age: 20,
//!     session: "secret".into(),
//! };
//! let encoded = encode(&profile).unwrap();
//! assert_eq!(&encoded[..], b"age=20&aliases=johnny&aliases=jonny&name=john");
//!
//! let mut decoded = Profile::default();
//! decode(encoded, &mut decoded).unwrap();
//! assert_eq!(decoded, Profile { session: String::new(), ..profile });
//! ```
//!
//! Decoding writes through a mutable reference, so a shared destination does not compile:
//!
//! ```compile_fail
//! use webform_codec::decode;
//!
//! let value = 0u8;
//! decode(&b"1"[..], &value).unwrap();
//! ```

// Lets generated code refer to `::webform_codec` from within this crate.
extern crate self as webform_codec;

pub mod codec;
pub mod config;
mod decode;
mod encode;
pub mod error;
pub mod escape;
pub mod hooks;
pub mod stream;
pub mod tags;
pub mod types;

// Re-export main types and traits
pub use codec::{Decode, Encode, Form, Key, Kind, Width};
pub use config::Config;
pub use decode::{decode, decode_cfg};
pub use encode::encode;
pub use error::{BoxError, Error};
pub use hooks::{Marshaler, Unmarshaler};
pub use stream::{Decoder, Encoder};
pub use tags::{descriptors_for, Descriptor, Record};
pub use types::map::MapKey;
pub use webform_macros::Form;
