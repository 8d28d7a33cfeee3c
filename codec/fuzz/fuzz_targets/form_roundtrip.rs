#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;
use webform_codec::{decode, decode_cfg, encode, escape, Config, Form};

#[derive(Arbitrary, Debug, Default, PartialEq, Form)]
struct Record {
    #[form = "name"]
    name: String,
    #[form = "tags,omitempty"]
    tags: Vec<String>,
    #[form = "count"]
    count: u32,
    #[form = "ratio"]
    ratio: i64,
    #[form = "flag"]
    flag: bool,
    #[form = "note,omitempty"]
    note: Option<String>,
    #[form = "-"]
    skipped: u8,
}

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    Raw(Vec<u8>),
    Escape(String),
    Record(Record),
    Values(BTreeMap<String, Vec<String>>),
    Bounded { data: Vec<u8>, max_len: u8, max_values: u8 },
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Raw(data) => {
            // Arbitrary bytes must never panic, and whatever decodes must re-encode canonically.
            let mut record = Record::default();
            if decode(Bytes::from(data.clone()), &mut record).is_ok() {
                let first = encode(&record).expect("decoded record must encode");
                let mut again = Record::default();
                decode(first.clone(), &mut again).expect("canonical payload must decode");
                assert_eq!(encode(&again).expect("must encode"), first);
            }

            let mut values = escape::Values::new();
            if decode(Bytes::from(data.clone()), &mut values).is_ok() {
                let canonical = escape::encode_values(&values);
                let reparsed = escape::decode_values(canonical.as_bytes())
                    .expect("canonical values must parse");
                assert_eq!(escape::encode_values(&reparsed), canonical);
            }

            let mut tokens = Vec::<String>::new();
            let _ = decode(Bytes::from(data), &mut tokens);
        }
        FuzzInput::Escape(text) => {
            let escaped = escape::escape(&text);
            assert_eq!(escape::unescape(&escaped).expect("escaped text must unescape"), text);
        }
        FuzzInput::Record(record) => {
            let encoded = encode(&record).expect("record must encode");
            let mut decoded = Record::default();
            decode(encoded.clone(), &mut decoded).expect("encoded record must decode");
            assert_eq!(encode(&decoded).expect("must encode"), encoded);
        }
        FuzzInput::Values(values) => {
            let encoded = encode(&values).expect("values must encode");
            let mut decoded = escape::Values::new();
            decode(encoded, &mut decoded).expect("encoded values must decode");
        }
        FuzzInput::Bounded {
            data,
            max_len,
            max_values,
        } => {
            let cfg = Config::new()
                .with_max_len(max_len as usize)
                .with_max_values(max_values as usize);
            let mut record = Record::default();
            let _ = decode_cfg(data.as_slice(), &mut record, &cfg);
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
