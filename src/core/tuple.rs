// =============================================================================
// TUPLE : Normalisation "scalaire ou séquence" des arguments
// =============================================================================
//
// Beaucoup de constructeurs acceptent indifféremment une valeur seule ou
// une séquence : les dimensions d'un IterationSpace, la paire de sets d'une
// Mat... as_tuple ramène tout ça à une séquence de forme fixe :
//
//   Absent            → []
//   Seq([a, b, c])    → [a, b, c]
//   Scalar(x)         → [x; length]   (length vaut 1 par défaut)
//
// Puis, si demandé :
//   - la longueur doit être EXACTEMENT `length`   (LengthMismatch)
//   - chaque élément doit satisfaire le `Kind`     (TypeConstraint)
//
// =============================================================================

use super::error::{Op2Error, Result};
use super::set::Set;

/// Un argument qui peut être absent, une valeur seule, ou une séquence.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<T> {
    Absent,
    Scalar(T),
    Seq(Vec<T>),
}

impl<T> From<Vec<T>> for Item<T> {
    fn from(v: Vec<T>) -> Self {
        Item::Seq(v)
    }
}

impl<T, const N: usize> From<[T; N]> for Item<T> {
    fn from(v: [T; N]) -> Self {
        Item::Seq(v.into())
    }
}

impl<T> From<Option<Vec<T>>> for Item<T> {
    fn from(v: Option<Vec<T>>) -> Self {
        v.map_or(Item::Absent, Item::Seq)
    }
}

impl From<i64> for Item<i64> {
    fn from(v: i64) -> Self {
        Item::Scalar(v)
    }
}

impl From<Set> for Item<Set> {
    fn from(s: Set) -> Self {
        Item::Scalar(s)
    }
}

impl From<&Set> for Item<Set> {
    fn from(s: &Set) -> Self {
        Item::Scalar(s.clone())
    }
}

impl From<(Set, Set)> for Item<Set> {
    fn from((a, b): (Set, Set)) -> Self {
        Item::Seq(vec![a, b])
    }
}

/// Un prédicat nommé sur les éléments d'un tuple.
///
/// Le nom apparaît dans le message d'erreur : "Items need to be of <name>".
pub struct Kind<T> {
    pub name: &'static str,
    pub accepts: fn(&T) -> bool,
}

/// Entiers positifs ou nuls (dimensions d'itération).
pub const NON_NEGATIVE: Kind<i64> = Kind {
    name: "non-negative int",
    accepts: |v| *v >= 0,
};

/// Normalise `item` en séquence, puis vérifie longueur et genre.
pub fn as_tuple<T: Clone>(
    item: impl Into<Item<T>>,
    kind: Option<&Kind<T>>,
    length: Option<usize>,
) -> Result<Vec<T>> {
    let t = match item.into() {
        Item::Absent => Vec::new(),
        Item::Seq(v) => v,
        Item::Scalar(x) => vec![x; length.unwrap_or(1)],
    };

    if let Some(expected) = length {
        if t.len() != expected {
            return Err(Op2Error::LengthMismatch { expected, actual: t.len() });
        }
    }

    if let Some(kind) = kind {
        if !t.iter().all(kind.accepts) {
            return Err(Op2Error::TypeConstraint(format!(
                "Items need to be of {}",
                kind.name
            )));
        }
    }

    Ok(t)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_empty() {
        let t: Vec<i64> = as_tuple(Item::Absent, None, None).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_scalar_is_replicated() {
        assert_eq!(as_tuple::<i64>(5i64, None, Some(3)).unwrap(), vec![5, 5, 5]);
        assert_eq!(as_tuple::<i64>(7i64, None, None).unwrap(), vec![7]);
    }

    #[test]
    fn test_sequence_kept_in_order() {
        assert_eq!(as_tuple::<i64>(vec![1i64, 2, 3], None, Some(3)).unwrap(), vec![1, 2, 3]);
        assert_eq!(as_tuple::<i64>([4i64, 2], None, None).unwrap(), vec![4, 2]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = as_tuple::<i64>(vec![1i64, 2], None, Some(3)).unwrap_err();
        assert!(matches!(err, Op2Error::LengthMismatch { expected: 3, actual: 2 }));

        // Absent ne satisfait pas une longueur non nulle
        let err = as_tuple::<i64>(Item::Absent, None, Some(2)).unwrap_err();
        assert!(matches!(err, Op2Error::LengthMismatch { expected: 2, actual: 0 }));
    }

    #[test]
    fn test_kind_rejects_element() {
        let err = as_tuple::<i64>(vec![2i64, -1], Some(&NON_NEGATIVE), None).unwrap_err();
        assert!(err.to_string().contains("non-negative int"));
        assert!(as_tuple::<i64>(vec![0i64, 4], Some(&NON_NEGATIVE), None).is_ok());
    }

    #[test]
    fn test_zero_length_is_exact() {
        // Some(0) exige un tuple vide : un scalaire n'est pas répliqué
        assert_eq!(as_tuple::<i64>(5i64, None, Some(0)).unwrap(), Vec::<i64>::new());
        assert!(as_tuple::<i64>(Item::Absent, None, Some(0)).unwrap().is_empty());
        let err = as_tuple::<i64>(vec![1i64], None, Some(0)).unwrap_err();
        assert!(matches!(err, Op2Error::LengthMismatch { expected: 0, actual: 1 }));
    }

    #[test]
    fn test_set_pair() {
        let s = Set::new(3, "cells");
        let pair = as_tuple::<Set>(&s, None, Some(2)).unwrap();
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0], s);
        assert_eq!(pair[1], s);
    }
}
