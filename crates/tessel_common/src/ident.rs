//! Interned names for modules, ports, and signals.
//!
//! Every name that flows through lowering is interned once, after which
//! comparisons and hashing cost a `u32`. The interner is shared by reference
//! through the whole build, so equal strings always yield equal [`Ident`]s.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned name.
///
/// Cheap to copy and compare; resolve back to the string through the
/// [`Interner`] that produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Wraps a raw interner index. Intended for deserialization and tests;
    /// normal code obtains idents from [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Unwraps the raw interner index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: the wrapped `u32` always fits in `usize` on supported platforms,
// and `try_from_usize` rejects indices that do not fit back into `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// String interner handing out [`Ident`]s.
///
/// Backed by [`lasso::ThreadedRodeo`]; interning the same string twice
/// returns the same ident without allocating.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns `s`, returning its [`Ident`].
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves an ident back to its string.
    ///
    /// # Panics
    ///
    /// Panics if `ident` did not come from this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
