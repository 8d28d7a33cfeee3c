//! Codec implementations for sequences.
//!
//! Every element of a sequence becomes one value on the wire. Elements must be scalars,
//! optionals of scalars, or hooked types; nested sequences, maps and records are rejected.

use crate::{Decode, Encode, Form, Kind};

// Vec implementation
impl<T: Form> Form for Vec<T> {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
}

impl<T: Encode> Encode for Vec<T> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn elements(&self) -> Vec<&dyn Encode> {
        self.as_slice().elements()
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn resize(&mut self, len: usize) -> Vec<&mut dyn Decode> {
        self.clear();
        self.resize_with(len, T::default);
        self.iter_mut().map(|item| item as &mut dyn Decode).collect()
    }
}

// Slice implementation
impl<T: Form> Form for [T] {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
}

impl<T: Encode> Encode for [T] {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn elements(&self) -> Vec<&dyn Encode> {
        self.iter().map(|item| item as &dyn Encode).collect()
    }
}

// Array implementation
impl<T: Form, const N: usize> Form for [T; N] {
    #[inline]
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn is_empty_value(&self) -> bool {
        N == 0
    }

    fn elements(&self) -> Vec<&dyn Encode> {
        self.as_slice().elements()
    }
}
