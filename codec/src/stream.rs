//! Encode to and decode from byte streams.

use crate::{decode_cfg, encode, Config, Decode, Encode, Error};
use std::io::{Read, Write};

/// Reads a whole payload from a reader and decodes it.
pub struct Decoder<R: Read> {
    reader: R,
    cfg: Config,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder without limits.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, Config::default())
    }

    /// Creates a decoder that applies `cfg` to every payload.
    ///
    /// No more than `max_len + 1` bytes are read from the reader.
    pub fn with_config(reader: R, cfg: Config) -> Self {
        Self { reader, cfg }
    }

    /// Reads the reader to its end and decodes the bytes into `out`.
    pub fn decode<T: Decode>(&mut self, out: &mut T) -> Result<(), Error> {
        let limit = (self.cfg.max_len() as u64).saturating_add(1);
        let mut body = Vec::new();
        (&mut self.reader)
            .take(limit)
            .read_to_end(&mut body)
            .map_err(Error::ReadFailure)?;
        decode_cfg(body.as_slice(), out, &self.cfg)
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Encodes values and writes them to a writer.
pub struct Encoder<W: Write> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Encodes `value` and writes the whole payload.
    ///
    /// Nothing is written if encoding fails.
    pub fn encode<T: Encode>(&mut self, value: &T) -> Result<(), Error> {
        let payload = encode(value)?;
        self.writer
            .write_all(&payload)
            .map_err(Error::WriteFailure)
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::BTreeMap, io};

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts at most one byte per call.
    struct TrickleWriter(Vec<u8>);

    impl Write for TrickleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let Some(&byte) = buf.first() else {
                return Ok(0);
            };
            self.0.push(byte);
            Ok(1)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_decoder() {
        let mut decoder = Decoder::new(&b"a=1&b=2"[..]);
        let mut values = BTreeMap::<String, u32>::new();
        decoder.decode(&mut values).unwrap();
        assert_eq!(values, BTreeMap::from([("a".into(), 1), ("b".into(), 2)]));
    }

    #[test]
    fn test_decoder_invalid() {
        let mut decoder = Decoder::new(&b"%%%"[..]);
        let mut values = BTreeMap::<String, String>::new();
        assert!(matches!(
            decoder.decode(&mut values),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_decoder_read_failure() {
        let mut decoder = Decoder::new(FailingReader);
        let mut value = String::new();
        let err = decoder.decode(&mut value).unwrap_err();
        assert!(matches!(err, Error::ReadFailure(ref err) if err.kind() == io::ErrorKind::ConnectionReset));
    }

    #[test]
    fn test_decoder_bounded_read() {
        let cfg = Config::new().with_max_len(4);
        let mut decoder = Decoder::with_config(&b"0123456789"[..], cfg);
        let mut value = String::new();
        assert!(matches!(
            decoder.decode(&mut value),
            Err(Error::LengthExceeded(5, 4))
        ));
        assert_eq!(decoder.into_inner(), b"56789");
    }

    #[test]
    fn test_encoder() {
        let mut encoder = Encoder::new(Vec::new());
        encoder.encode(&["a b", "c"]).unwrap();
        assert_eq!(encoder.into_inner(), b"a+b&c");
    }

    #[test]
    fn test_encoder_partial_writes() {
        let mut encoder = Encoder::new(TrickleWriter(Vec::new()));
        encoder.encode(&"hello & world?").unwrap();
        assert_eq!(encoder.into_inner().0, b"hello+%26+world%3F");
    }

    #[test]
    fn test_encoder_write_failure() {
        let mut encoder = Encoder::new(FailingWriter);
        assert!(matches!(
            encoder.encode(&1),
            Err(Error::WriteFailure(_))
        ));
    }

    #[test]
    fn test_encoder_encode_failure() {
        let mut encoder = Encoder::new(Vec::new());
        let value = BTreeMap::from([(1u8, 1u8)]);
        assert!(matches!(
            encoder.encode(&value),
            Err(Error::UnsupportedKeyType("u8"))
        ));
        assert!(encoder.into_inner().is_empty());
    }
}
