// =============================================================================
// KERNEL : Le code utilisateur exécuté pour chaque élément
// =============================================================================
//
// Un Kernel est un nom + un texte source opaque. Il n'existe aucune
// représentation compilée : compile() et handle() sont des points
// d'extension pour un futur backend et n'ont aucun effet observable.
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Kernel {
    name: String,
    code: Arc<str>,
}

impl Kernel {
    pub fn new(name: impl Into<String>, code: impl Into<Arc<str>>) -> Self {
        let kernel = Kernel {
            name: name.into(),
            code: code.into(),
        };
        tracing::debug!(kernel = %kernel.name, bytes = kernel.code.len(), "kernel declared");
        kernel
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Point d'extension : aucun backend de compilation n'est branché.
    pub fn compile(&self) {
        tracing::trace!(kernel = %self.name, "compile: no backend");
    }

    /// Point d'extension : aucun backend d'exécution n'est branché.
    pub fn handle(&self) {
        tracing::trace!(kernel = %self.name, "handle: no backend");
    }

    pub fn repr(&self) -> String {
        format!("Kernel(\"{}\", \"\"\"{}\"\"\")", self.name, self.code)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OP2 Kernel: {}", self.name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_keeps_code() {
        let k = Kernel::new("res", "void res(double *x) { *x += 1.0; }");
        assert_eq!(k.name(), "res");
        assert!(k.code().starts_with("void res"));
        k.compile();
        k.handle();
        assert_eq!(k.to_string(), "OP2 Kernel: res");
        assert_eq!(k.clone().repr(), k.repr());
    }
}
