//! Primitive container types used by the data model and codec.
//!
//! The original implementation built everything from an intrusive doubly-linked
//! list (`dlist`), a hierarchical node carrying two fixed child lists (`hlist`),
//! and a dynamic pointer array (`PTR_ARRAY`). This rewrite replaces the first two
//! with a generational [`Arena`] and owned `Vec` fields, and keeps the third as a
//! thin [`PtrArray`] wrapper.

mod arena;
mod ptrarray;

pub use arena::{Arena, ArenaIndex};
pub use ptrarray::PtrArray;
