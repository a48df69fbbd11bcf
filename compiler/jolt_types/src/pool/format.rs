//! Human-readable type rendering for logs and tests.

use super::TypePool;
use crate::{TypeData, TypeId};

impl TypePool {
    /// Render a type in source syntax: `int[]`, `java.util.Map.Entry`,
    /// `void(int, java.lang.String)`.
    pub fn format_type(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.format_into(id, &mut out);
        out
    }

    fn format_into(&self, id: TypeId, out: &mut String) {
        if let Some(name) = id.name() {
            out.push_str(name);
            return;
        }
        match self.data(id) {
            TypeData::Array(element) => {
                self.format_into(element, out);
                out.push_str("[]");
            }
            TypeData::Class(_) => {
                if let Some(name) = self.class_name(id) {
                    out.push_str(&self.symbols.display_name(name));
                }
            }
            TypeData::Method { ret, args } => {
                self.format_into(ret, out);
                out.push('(');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.format_into(arg, out);
                }
                out.push(')');
            }
            // Fixed types are rendered from their TypeId above
            _ => {}
        }
    }
}
