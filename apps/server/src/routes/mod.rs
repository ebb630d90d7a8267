pub mod pages;

pub use pages::{index, not_found};
