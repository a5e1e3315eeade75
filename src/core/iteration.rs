// =============================================================================
// ITERATION SPACE : Le domaine d'indices d'une boucle parallèle
// =============================================================================
//
// Un IterationSpace est un Set (dimension extérieure : ses entités) plus des
// dimensions intérieures supplémentaires :
//
//   IterationSpace(cells, (3, 3))   → pour chaque cellule, une grille 3 × 3
//   IterationSpace(cells, ())       → une itération par cellule
//
// Les dimensions passent par as_tuple : un entier seul devient (n,), et
// chaque entrée doit être un entier positif ou nul.
//
// =============================================================================

use std::fmt;

use serde::Serialize;

use super::error::Result;
use super::set::Set;
use super::tuple::{as_tuple, Item, NON_NEGATIVE};

#[derive(Debug, Clone, Serialize)]
pub struct IterationSpace {
    set: Set,
    dims: Vec<usize>,
}

impl IterationSpace {
    pub fn new(set: &Set, dims: impl Into<Item<i64>>) -> Result<Self> {
        let dims = as_tuple::<i64>(dims, Some(&NON_NEGATIVE), None)?
            .into_iter()
            .map(|d| d as usize)
            .collect();
        Ok(IterationSpace {
            set: set.clone(),
            dims,
        })
    }

    pub fn set(&self) -> &Set {
        &self.set
    }

    /// Les dimensions intérieures
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Nombre total de points : |set| × produit des dimensions intérieures.
    /// `None` si le produit dépasse usize.
    pub fn extent(&self) -> Option<usize> {
        self.dims
            .iter()
            .try_fold(self.set.size(), |acc, &d| acc.checked_mul(d))
    }

    pub fn repr(&self) -> String {
        format!("IterationSpace({}, {})", self.set.repr(), fmt_dims(&self.dims))
    }
}

/// Rend les dimensions comme un tuple : (), (3,), (3, 3)
fn fmt_dims(dims: &[usize]) -> String {
    match dims {
        [] => "()".to_string(),
        [single] => format!("({},)", single),
        many => {
            let items: Vec<String> = many.iter().map(|d| d.to_string()).collect();
            format!("({})", items.join(", "))
        }
    }
}

impl fmt::Display for IterationSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OP2 Iteration Space: {} and extra dimensions {}",
            self.set,
            fmt_dims(&self.dims)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Op2Error;

    #[test]
    fn test_scalar_dim() {
        let s = Set::new(4, "cells");
        let it = IterationSpace::new(&s, 3i64).unwrap();
        assert_eq!(it.dims(), &[3]);
        assert_eq!(it.extent(), Some(12));
        assert_eq!(it.set(), &s);
    }

    #[test]
    fn test_no_extra_dims() {
        let s = Set::new(4, "cells");
        let it = IterationSpace::new(&s, Item::Absent).unwrap();
        assert!(it.dims().is_empty());
        assert_eq!(it.extent(), Some(4));
    }

    #[test]
    fn test_extent_overflow() {
        let s = Set::new(1 << 40, "cells");
        let it = IterationSpace::new(&s, [1i64 << 40]).unwrap();
        assert_eq!(it.extent(), None);
    }

    #[test]
    fn test_negative_dim_rejected() {
        let s = Set::new(4, "cells");
        let err = IterationSpace::new(&s, vec![2i64, -1]).unwrap_err();
        assert!(matches!(err, Op2Error::TypeConstraint(_)));
    }

    #[test]
    fn test_iteration_renderings() {
        let s = Set::new(4, "cells");
        let it = IterationSpace::new(&s, [3i64, 3]).unwrap();
        insta::assert_snapshot!(
            it.to_string(),
            @"OP2 Iteration Space: OP2 Set: cells with size 4 and extra dimensions (3, 3)"
        );
        let one = IterationSpace::new(&s, 2i64).unwrap();
        assert_eq!(one.repr(), "IterationSpace(Set(4, 'cells'), (2,))");
    }
}
