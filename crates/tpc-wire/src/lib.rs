#[rustfmt::skip]
#[allow(clippy::pedantic, clippy::derive_partial_eq_without_eq)]
mod generated;

pub use generated::*;
