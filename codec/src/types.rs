//! Implementations of the codec traits for common types.
//!
//! References and smart pointers are transparent: they report the kind of their pointee and
//! forward every accessor, so hooks and records are found behind any level of indirection.

pub mod map;
pub mod primitives;
pub mod vec;

use crate::{
    hooks::{Marshaler, Unmarshaler},
    tags::Descriptor,
    Decode, Encode, Error, Form, Kind,
};
use std::{rc::Rc, sync::Arc};

macro_rules! impl_pointer {
    ($($pointer:ty),*) => {
        $(
            impl<T: Form + ?Sized> Form for $pointer {
                #[inline]
                fn kind(&self) -> Kind {
                    (**self).kind()
                }

                #[inline]
                fn type_name(&self) -> &'static str {
                    (**self).type_name()
                }
            }

            impl<T: Encode + ?Sized> Encode for $pointer {
                #[inline]
                fn is_empty_value(&self) -> bool {
                    (**self).is_empty_value()
                }

                #[inline]
                fn scalar(&self) -> Option<String> {
                    (**self).scalar()
                }

                #[inline]
                fn optional(&self) -> Option<&dyn Encode> {
                    (**self).optional()
                }

                #[inline]
                fn elements(&self) -> Vec<&dyn Encode> {
                    (**self).elements()
                }

                #[inline]
                fn entries(&self) -> Vec<(&str, &dyn Encode)> {
                    (**self).entries()
                }

                #[inline]
                fn fields(&self) -> Vec<(&'static Descriptor, &dyn Encode)> {
                    (**self).fields()
                }

                #[inline]
                fn marshaler(&self) -> Option<&dyn Marshaler> {
                    (**self).marshaler()
                }
            }
        )*
    };
}

impl_pointer!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: Decode + ?Sized> Decode for Box<T> {
    #[inline]
    fn parse_scalar(&mut self, literal: &str) -> Result<(), Error> {
        (**self).parse_scalar(literal)
    }

    #[inline]
    fn optional_mut(&mut self) -> Option<&mut dyn Decode> {
        (**self).optional_mut()
    }

    #[inline]
    fn resize(&mut self, len: usize) -> Vec<&mut dyn Decode> {
        (**self).resize(len)
    }

    #[inline]
    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Decode> {
        (**self).entry_mut(key)
    }

    #[inline]
    fn fields_mut(&mut self) -> Vec<(&'static Descriptor, &mut dyn Decode)> {
        (**self).fields_mut()
    }

    #[inline]
    fn unmarshaler(&mut self) -> Option<&mut dyn Unmarshaler> {
        (**self).unmarshaler()
    }
}
