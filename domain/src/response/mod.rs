//! Backend response capabilities.

pub mod extract;
