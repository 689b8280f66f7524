use super::{Declaration, Notation, RenderContext};
use crate::types::Type;

/// Type aliases declared inside a `declare module` block.
#[derive(Debug, Clone)]
pub struct Flow {
    module: String,
}

impl Flow {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }
}

impl Notation for Flow {
    fn declaration(&self, name: &str, _ty: &Type) -> Declaration {
        Declaration {
            head: format!("declare type {} = ", name),
            tail: "",
        }
    }

    fn begin(&self, ctx: &mut RenderContext) {
        ctx.push(&format!("declare module \"{}\" {{", self.module));
        ctx.indent();
        ctx.newline();
    }

    fn end(&self, ctx: &mut RenderContext) {
        ctx.dedent();
        ctx.push("}");
        ctx.newline();
    }
}
