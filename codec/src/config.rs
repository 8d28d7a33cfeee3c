//! Limits applied when decoding untrusted input.

/// Configuration for bounding the work done by [crate::decode_cfg].
///
/// Both limits are unbounded by default.
///
/// # Examples
///
/// ```
/// use webform_codec::{decode_cfg, Config, Error};
///
/// let cfg = Config::new().with_max_len(16).with_max_values(2);
///
/// let mut values = Vec::<u32>::new();
/// decode_cfg(&b"1&2"[..], &mut values, &cfg).unwrap();
/// assert_eq!(values, [1, 2]);
///
/// let result = decode_cfg(&b"1&2&3"[..], &mut values, &cfg);
/// assert!(matches!(result, Err(Error::TooManyValues(3, 2))));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Config {
    /// The maximum payload length, in bytes.
    max_len: usize,

    /// The maximum number of non-empty `&`-separated segments.
    max_values: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates an unbounded configuration.
    pub const fn new() -> Self {
        Self {
            max_len: usize::MAX,
            max_values: usize::MAX,
        }
    }

    /// Limits the payload length.
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Limits the number of segments.
    pub const fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    /// Returns the maximum payload length.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Returns the maximum number of segments.
    pub const fn max_values(&self) -> usize {
        self.max_values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let cfg = Config::default();
        assert_eq!(cfg.max_len(), usize::MAX);
        assert_eq!(cfg.max_values(), usize::MAX);
        assert_eq!(cfg, Config::new());
    }

    #[test]
    fn test_builders() {
        const CFG: Config = Config::new().with_max_len(1024).with_max_values(8);
        assert_eq!(CFG.max_len(), 1024);
        assert_eq!(CFG.max_values(), 8);
    }
}
