//! Derive and test macros for `webform-codec`.

pub use webform_macros_impl::{test_traced, Form};

// Hidden from docs because these are needed for the proc macros to use 3rd
// party crates.
#[doc(hidden)]
pub use ::tracing;
#[doc(hidden)]
pub use ::tracing_subscriber;
