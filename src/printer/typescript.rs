use super::{Declaration, Notation};
use crate::types::Type;

/// Structures become exported interfaces, everything else a type alias.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScript;

impl Notation for TypeScript {
    fn declaration(&self, name: &str, ty: &Type) -> Declaration {
        if ty.is_structure() {
            Declaration {
                head: format!("export interface {} ", name),
                tail: "",
            }
        } else {
            Declaration {
                head: format!("export type {} = ", name),
                tail: ";",
            }
        }
    }
}
