// =============================================================================
// CONST : Une valeur partagée par tous les éléments de tous les Sets
// =============================================================================
//
// Un Const est toujours LU (mode READ fixé à la construction). Il n'a pas de
// binding : on le passe tel quel dans la liste d'arguments d'une boucle.
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::access::{Access, READ};
use super::carrier::DataCarrier;
use super::datatype::{fmt_values, Datatype, Scalar};
use super::error::{Op2Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Const {
    dim: usize,
    datatype: Datatype,
    value: Arc<[Scalar]>,
    name: String,
}

impl Const {
    /// Déclare un Const de `dim` composantes ; `value` doit en contenir `dim`.
    pub fn new(
        dim: usize,
        datatype: impl Into<Datatype>,
        value: Vec<Scalar>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if value.len() != dim {
            return Err(Op2Error::ShapeMismatch {
                what: format!("valeur du Const '{}'", name),
                expected: dim,
                actual: value.len(),
            });
        }
        let datatype = datatype.into();
        tracing::debug!(constant = %name, dim, %datatype, "const declared");
        Ok(Const {
            dim,
            datatype,
            value: value.into(),
            name,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub fn value(&self) -> &[Scalar] {
        &self.value
    }

    pub fn repr(&self) -> String {
        format!(
            "Const({}, '{}', {}, '{}')",
            self.dim,
            self.datatype,
            fmt_values(&self.value),
            self.name
        )
    }
}

impl DataCarrier for Const {
    const KIND: &'static str = "Const";
    const MODES: &'static [Access] = &[READ];

    fn name(&self) -> &str {
        &self.name
    }

    /// Toujours READ
    fn access(&self) -> Option<Access> {
        Some(READ)
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OP2 Const: {} of dim {} and type {}, value {}",
            self.name,
            self.dim,
            self.datatype,
            fmt_values(&self.value)
        )
    }
}
