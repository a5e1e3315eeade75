// =============================================================================
// DAT : Des données attachées à chaque entité d'un Set
// =============================================================================
//
// Un Dat associe `dim` valeurs à chaque entité de son Set :
//
//   nodes = { n0, n1, n2, n3 }        x : Dat(nodes, dim 2, "double")
//   x(n0) = (0.0, 0.0)
//   x(n1) = (1.0, 0.0)                data = [0.0, 0.0,  1.0, 0.0, ...]
//   ...
//
// BINDING : pour passer un Dat à une boucle, on le lie à une Map et à un
// mode d'accès : `x.bind(&m, READ)`. Le binding produit une COPIE liée ;
// le Dat déclaré reste intact et peut être lié autrement ailleurs :
//
//   let r  = x.bind(&m, READ)?;     // x n'a toujours ni map ni accès
//   let w  = x.bind(&m, RW)?;       // indépendant de r
//
// La Map doit partir du Set du Dat (comparaison par identité).
// Les données sont partagées entre le Dat et ses copies liées.
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::access::{Access, INC, READ, RW, WRITE};
use super::carrier::DataCarrier;
use super::datatype::{Datatype, Scalar};
use super::error::{Op2Error, Result};
use super::map::Map;
use super::set::Set;

/// Un Dat OP2, éventuellement lié à une Map et un mode d'accès.
#[derive(Debug, Clone, Serialize)]
pub struct Dat {
    set: Set,
    dim: usize,
    datatype: Datatype,
    #[serde(skip)]
    data: Option<Arc<[Scalar]>>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<Map>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access: Option<Access>,
}

impl Dat {
    /// Déclare un Dat sur `set`.
    ///
    /// `data`, si fourni, doit contenir |set| × dim valeurs.
    pub fn new(
        set: &Set,
        dim: usize,
        datatype: impl Into<Datatype>,
        data: Option<Vec<Scalar>>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(values) = &data {
            let expected = set.size().checked_mul(dim).ok_or_else(|| {
                Op2Error::TypeConstraint(format!(
                    "Dat '{}' : |{}| × dim dépasse la taille adressable",
                    name,
                    set.name()
                ))
            })?;
            if values.len() != expected {
                return Err(Op2Error::ShapeMismatch {
                    what: format!("données du Dat '{}'", name),
                    expected,
                    actual: values.len(),
                });
            }
        }
        let datatype = datatype.into();
        tracing::debug!(dat = %name, set = %set.name(), dim, %datatype, "dat declared");
        Ok(Dat {
            set: set.clone(),
            dim,
            datatype,
            data: data.map(Into::into),
            name,
            map: None,
            access: None,
        })
    }

    /// Lie ce Dat à `map` en mode `access`. Retourne une copie liée.
    pub fn bind(&self, map: &Map, access: Access) -> Result<Self> {
        self.check_access(access)?;
        if map.from_set() != &self.set {
            return Err(Op2Error::SetMismatch {
                map: map.name().to_string(),
                actual: map.from_set().name().to_string(),
                expected: self.set.name().to_string(),
            });
        }
        tracing::debug!(dat = %self.name, map = %map.name(), access = access.mode(), "dat bound");
        Ok(Dat {
            map: Some(map.clone()),
            access: Some(access),
            ..self.clone()
        })
    }

    pub fn set(&self) -> &Set {
        &self.set
    }

    /// Nombre de composantes par entité
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub fn data(&self) -> Option<&[Scalar]> {
        self.data.as_deref()
    }

    /// Les `dim` valeurs de l'entité `elem`, si le Dat porte des données.
    pub fn element(&self, elem: usize) -> Option<&[Scalar]> {
        if elem >= self.set.size() {
            return None;
        }
        self.data()?.get(elem * self.dim..(elem + 1) * self.dim)
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    pub fn repr(&self) -> String {
        let call = match (&self.map, self.access) {
            (Some(map), Some(access)) => format!("({}, {})", map.repr(), access.repr()),
            _ => String::new(),
        };
        format!(
            "Dat({}, {}, '{}', None, '{}'){}",
            self.set.repr(),
            self.dim,
            self.datatype,
            self.name,
            call
        )
    }
}

impl DataCarrier for Dat {
    const KIND: &'static str = "Dat";
    const MODES: &'static [Access] = &[READ, WRITE, RW, INC];

    fn name(&self) -> &str {
        &self.name
    }

    fn access(&self) -> Option<Access> {
        self.access
    }
}

impl fmt::Display for Dat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OP2 Dat: {} on ({}) with dim {} and datatype {}",
            self.name, self.set, self.dim, self.datatype
        )?;
        if let (Some(map), Some(access)) = (&self.map, self.access) {
            write!(f, " associated with ({}) in mode {}", map, access)?;
        }
        Ok(())
    }
}
