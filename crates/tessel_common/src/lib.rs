//! Foundation types shared across the Tessel synthesis front end.
//!
//! Provides the interned-identifier machinery ([`Ident`], [`Interner`]) and
//! the dense [`Arena`] container that backs every ID-addressed collection in
//! the AST and graph crates.

#![warn(missing_docs)]

pub mod arena;
pub mod ident;

pub use arena::{Arena, ArenaId};
pub use ident::{Ident, Interner};
