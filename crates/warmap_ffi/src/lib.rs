//! Flutter bridge crate for War Map core.

pub mod api;
