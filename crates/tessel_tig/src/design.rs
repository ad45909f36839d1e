//! The top-level design container.

use crate::ids::ModuleId;
use crate::module::Module;
use serde::{Deserialize, Serialize};
use tessel_common::{Arena, Ident};

/// A complete technology-independent graph: one entry per lowered module.
///
/// Module ids are arena positions and are never reused or reordered, so a
/// [`NodeKind::Instance`](crate::NodeKind::Instance) binding stays valid for
/// the life of the design. A `Tig` is mutated only through a
/// [`Builder`](crate::Builder) and is frozen once the build that produced it
/// returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tig {
    /// All lowered modules, in creation order.
    pub modules: Arena<ModuleId, Module>,
}

impl Tig {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self {
            modules: Arena::new(),
        }
    }

    /// Number of modules in the design.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Looks up a module by name; first match in creation order.
    pub fn find_module(&self, name: Ident) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|(_, m)| m.name == name)
            .map(|(id, _)| id)
    }
}
