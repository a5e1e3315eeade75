// =============================================================================
// MAT : Des données sur le produit cartésien de deux Sets
// =============================================================================
//
// Une Mat porte une valeur (de dimension `dim`) pour chaque couple
// (entité ligne, entité colonne) : typiquement la structure de blocs d'une
// matrice creuse assemblée sur un maillage.
//
// Ses deux Sets passent par as_tuple(sets, longueur 2) : un Set seul donne
// une Mat carrée (ligne = colonne).
//
// BINDING : `A.bind((&row_map, &col_map), INC)`. Chaque Map doit partir du
// Set correspondant (row_map depuis le Set ligne, col_map depuis le Set
// colonne), sinon SetMismatch.
//
// =============================================================================

use std::fmt;

use serde::Serialize;

use super::access::{Access, INC, READ, RW, WRITE};
use super::carrier::DataCarrier;
use super::datatype::Datatype;
use super::error::{Op2Error, Result};
use super::map::Map;
use super::set::Set;
use super::tuple::{as_tuple, Item};

/// Une Mat OP2, éventuellement liée à une paire de Maps.
#[derive(Debug, Clone, Serialize)]
pub struct Mat {
    sets: (Set, Set),
    dim: usize,
    datatype: Datatype,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    maps: Option<(Map, Map)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access: Option<Access>,
}

impl Mat {
    /// Déclare une Mat sur `sets` : un Set (Mat carrée) ou une paire.
    pub fn new(
        sets: impl Into<Item<Set>>,
        dim: usize,
        datatype: impl Into<Datatype>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let mut sets = as_tuple::<Set>(sets, None, Some(2))?.into_iter();
        let (Some(rows), Some(cols)) = (sets.next(), sets.next()) else {
            return Err(Op2Error::LengthMismatch { expected: 2, actual: 0 });
        };
        let datatype = datatype.into();
        tracing::debug!(mat = %name, rows = %rows.name(), cols = %cols.name(), dim, "mat declared");
        Ok(Mat {
            sets: (rows, cols),
            dim,
            datatype,
            name,
            maps: None,
            access: None,
        })
    }

    /// Lie cette Mat à une paire (map ligne, map colonne). Retourne une copie liée.
    pub fn bind(&self, maps: (&Map, &Map), access: Access) -> Result<Self> {
        self.check_access(access)?;
        for (map, set) in [(maps.0, &self.sets.0), (maps.1, &self.sets.1)] {
            if map.from_set() != set {
                return Err(Op2Error::SetMismatch {
                    map: map.name().to_string(),
                    actual: map.from_set().name().to_string(),
                    expected: set.name().to_string(),
                });
            }
        }
        tracing::debug!(
            mat = %self.name,
            row_map = %maps.0.name(),
            col_map = %maps.1.name(),
            access = access.mode(),
            "mat bound"
        );
        Ok(Mat {
            maps: Some((maps.0.clone(), maps.1.clone())),
            access: Some(access),
            ..self.clone()
        })
    }

    pub fn row_set(&self) -> &Set {
        &self.sets.0
    }

    pub fn col_set(&self) -> &Set {
        &self.sets.1
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub fn maps(&self) -> Option<(&Map, &Map)> {
        self.maps.as_ref().map(|(r, c)| (r, c))
    }

    pub fn repr(&self) -> String {
        let call = match (&self.maps, self.access) {
            (Some((r, c)), Some(access)) => {
                format!("(({}, {}), {})", r.repr(), c.repr(), access.repr())
            }
            _ => String::new(),
        };
        format!(
            "Mat(({}, {}), {}, '{}', '{}'){}",
            self.sets.0.repr(),
            self.sets.1.repr(),
            self.dim,
            self.datatype,
            self.name,
            call
        )
    }
}

impl DataCarrier for Mat {
    const KIND: &'static str = "Mat";
    const MODES: &'static [Access] = &[READ, WRITE, RW, INC];

    fn name(&self) -> &str {
        &self.name
    }

    fn access(&self) -> Option<Access> {
        self.access
    }
}

impl fmt::Display for Mat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OP2 Mat: {}, row set ({}), col set ({}), dimension {}, datatype {}",
            self.name, self.sets.0, self.sets.1, self.dim, self.datatype
        )?;
        if let (Some((r, c)), Some(access)) = (&self.maps, self.access) {
            write!(f, " associated with ({}, {}) in mode {}", r, c, access)?;
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

    fn mesh() -> (Set, Set, Map) {
        let nodes = Set::new(3, "nodes");
        let edges = Set::new(2, "edges");
        let m = Map::new(&edges, &nodes, 2, vec![0, 1, 1, 2], "edge2node").unwrap();
        (nodes, edges, m)
    }

    #[test]
    fn test_single_set_is_square() {
        let (nodes, _, _) = mesh();
        let a = Mat::new(&nodes, 1, "double", "A").unwrap();
        assert_eq!(a.row_set(), &nodes);
        assert_eq!(a.col_set(), &nodes);
    }

    #[test]
    fn test_wrong_arity() {
        let (nodes, edges, _) = mesh();
        let err = Mat::new(vec![nodes.clone(), edges, nodes], 1, "double", "A").unwrap_err();
        assert!(matches!(err, Op2Error::LengthMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_bind_matching_maps() {
        let (_, edges, m) = mesh();
        let a = Mat::new(&edges, 1, "double", "A").unwrap();
        let arg = a.bind((&m.indexed(0).unwrap(), &m.indexed(1).unwrap()), INC).unwrap();
        assert_eq!(arg.access(), Some(INC));
        let (r, c) = arg.maps().unwrap();
        assert_eq!((r.index(), c.index()), (Some(0), Some(1)));
        assert!(a.maps().is_none());
        assert!(arg.to_string().contains("in mode OP2 Access: INC"));
    }

    #[test]
    fn test_bind_mismatch_either_side() {
        let (nodes, edges, m) = mesh();
        let n2n = Map::new(&nodes, &nodes, 1, vec![0, 1, 2], "n2n").unwrap();
        let a = Mat::new((edges.clone(), nodes.clone()), 1, "double", "A").unwrap();

        // ligne OK, colonne OK
        assert!(a.bind((&m, &n2n), RW).is_ok());
        // ligne fausse
        let err = a.bind((&n2n, &n2n), RW).unwrap_err();
        assert!(matches!(err, Op2Error::SetMismatch { ref map, .. } if map == "n2n"));
        // colonne fausse
        let err = a.bind((&m, &m), RW).unwrap_err();
        assert!(matches!(err, Op2Error::SetMismatch { ref expected, .. } if expected == "nodes"));
    }

    #[test]
    fn test_mat_renderings() {
        let s = Set::new(2, "s");
        let a = Mat::new(&s, 1, "float", "A").unwrap();
        insta::assert_snapshot!(
            a.to_string(),
            @"OP2 Mat: A, row set (OP2 Set: s with size 2), col set (OP2 Set: s with size 2), dimension 1, datatype float"
        );
        assert_eq!(a.repr(), "Mat((Set(2, 's'), Set(2, 's')), 1, 'float', 'A')");

        let m = Map::new(&s, &s, 1, vec![1, 0], "swap").unwrap();
        let bound = a.bind((&m, &m.indexed(0).unwrap()), INC).unwrap();
        assert_eq!(
            bound.repr(),
            "Mat((Set(2, 's'), Set(2, 's')), 1, 'float', 'A')\
             ((Map(Set(2, 's'), Set(2, 's'), 1, None, 'swap'), \
             Map(Set(2, 's'), Set(2, 's'), 1, None, 'swap')(0)), Access('INC'))"
        );
    }
}
