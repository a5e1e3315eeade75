// =============================================================================
// GLOBAL : Une valeur unique, lue ou accumulée par une boucle
// =============================================================================
//
// Un Global n'est indexé par aucun Set : son binding n'attache QUE le mode
// d'accès, jamais de Map. C'est volontairement asymétrique par rapport à
// Dat/Mat.
//
//   let total = Global::new("total");
//   let arg = total.bind(INC)?;      // réduction
//   total.bind(WRITE)                → InvalidAccess
//
// =============================================================================

use std::fmt;

use serde::Serialize;

use super::access::{Access, INC, READ};
use super::carrier::DataCarrier;
use super::datatype::Scalar;
use super::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct Global {
    name: String,
    val: Scalar,
    #[serde(skip_serializing_if = "Option::is_none")]
    access: Option<Access>,
}

impl Global {
    /// Un Global de valeur initiale 0
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, Scalar::default())
    }

    pub fn with_value(name: impl Into<String>, val: impl Into<Scalar>) -> Self {
        let global = Global {
            name: name.into(),
            val: val.into(),
            access: None,
        };
        tracing::debug!(global = %global.name, val = %global.val, "global declared");
        global
    }

    /// Lie ce Global en mode `access` (READ ou INC). Retourne une copie liée.
    pub fn bind(&self, access: Access) -> Result<Self> {
        self.check_access(access)?;
        tracing::debug!(global = %self.name, access = access.mode(), "global bound");
        Ok(Global {
            access: Some(access),
            ..self.clone()
        })
    }

    pub fn val(&self) -> Scalar {
        self.val
    }

    pub fn repr(&self) -> String {
        let call = self
            .access
            .map(|a| format!("({})", a.repr()))
            .unwrap_or_default();
        format!("Global('{}', {}){}", self.name, self.val, call)
    }
}

impl DataCarrier for Global {
    const KIND: &'static str = "Global";
    const MODES: &'static [Access] = &[READ, INC];

    fn name(&self) -> &str {
        &self.name
    }

    fn access(&self) -> Option<Access> {
        self.access
    }
}

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OP2 Global Argument: {} with value {}", self.name, self.val)?;
        if let Some(access) = self.access {
            write!(f, " in mode {}", access)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::access::{RW, WRITE};
    use crate::core::error::Op2Error;

    #[test]
    fn test_bind_read_or_inc() {
        let g = Global::new("total");
        assert_eq!(g.bind(READ).unwrap().access(), Some(READ));
        assert_eq!(g.bind(INC).unwrap().access(), Some(INC));
        assert!(!g.is_bound());
    }

    #[test]
    fn test_bind_write_or_rw_fails() {
        let g = Global::new("total");
        for access in [WRITE, RW] {
            let err = g.bind(access).unwrap_err();
            assert!(matches!(err, Op2Error::InvalidAccess { carrier: "Global", .. }));
        }
    }

    #[test]
    fn test_default_value() {
        assert_eq!(Global::new("g").val(), Scalar::Int(0));
        assert_eq!(Global::with_value("g", 1.5).val(), Scalar::Real(1.5));
    }

    #[test]
    fn test_global_renderings() {
        let g = Global::new("total");
        insta::assert_snapshot!(g.to_string(), @"OP2 Global Argument: total with value 0");
        let bound = g.bind(INC).unwrap();
        insta::assert_snapshot!(
            bound.to_string(),
            @"OP2 Global Argument: total with value 0 in mode OP2 Access: INC"
        );
        assert_eq!(bound.repr(), "Global('total', 0)(Access('INC'))");
    }
}
