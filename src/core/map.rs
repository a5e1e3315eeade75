// =============================================================================
// MAP : Une relation d'arité fixe entre deux Sets
// =============================================================================
//
// Une Map relie chaque entité d'un Set source à `dim` entités d'un Set cible.
// Sa table est un tableau plat de |from| × dim indices :
//
//   edges --edge2node (dim 2)--> nodes
//
//   edge 0 → [0, 1]
//   edge 1 → [1, 2]        values = [0, 1,  1, 2,  2, 3]
//   edge 2 → [2, 3]
//
// INDEXATION : `m.indexed(i)` sélectionne UNE colonne de la table et produit
// une nouvelle Map (la table est partagée, pas copiée). Une Map est donc
// soit "ligne entière", soit "colonne i sélectionnée", jamais re-sélectionnable :
//
//   m.indexed(1)              → OK, composante 1
//   m.indexed(1).indexed(0)   → Reindex
//   m.indexed(dim)            → IndexRange
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::error::{Op2Error, Result};
use super::set::Set;

/// Une Map OP2 : `from` → `to`, `dim` cibles par entité source.
#[derive(Debug, Clone, Serialize)]
pub struct Map {
    from: Set,
    to: Set,
    dim: usize,
    #[serde(skip)]
    values: Arc<[usize]>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
}

impl Map {
    /// Crée une Map non indexée.
    ///
    /// `values` doit contenir exactement |from| × dim entrées, rangées ligne
    /// par ligne. Les bornes des entrées (< |to|) sont vérifiées par
    /// `validate::validate_map`, pas ici.
    pub fn new(
        from: &Set,
        to: &Set,
        dim: usize,
        values: Vec<usize>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if dim == 0 {
            return Err(Op2Error::TypeConstraint(format!(
                "Map '{}' : la dimension doit être strictement positive",
                name
            )));
        }
        let expected = from.size().checked_mul(dim).ok_or_else(|| {
            Op2Error::TypeConstraint(format!(
                "Map '{}' : |{}| × dim dépasse la taille adressable",
                name,
                from.name()
            ))
        })?;
        if values.len() != expected {
            return Err(Op2Error::ShapeMismatch {
                what: format!("table de la map '{}'", name),
                expected,
                actual: values.len(),
            });
        }
        tracing::debug!(map = %name, from = %from.name(), to = %to.name(), dim, "map declared");
        Ok(Map {
            from: from.clone(),
            to: to.clone(),
            dim,
            values: values.into(),
            name,
            index: None,
        })
    }

    /// Sélectionne la composante `index` : produit une nouvelle Map,
    /// la Map d'origine est inchangée.
    pub fn indexed(&self, index: usize) -> Result<Self> {
        if let Some(current) = self.index {
            return Err(Op2Error::Reindex { map: self.name.clone(), index: current });
        }
        if index >= self.dim {
            return Err(Op2Error::IndexRange {
                map: self.name.clone(),
                index: index as i64,
                dim: self.dim,
            });
        }
        tracing::debug!(map = %self.name, index, "map indexed");
        Ok(Map { index: Some(index), ..self.clone() })
    }

    pub fn from_set(&self) -> &Set {
        &self.from
    }

    pub fn to_set(&self) -> &Set {
        &self.to
    }

    /// Arité de la relation (nombre de cibles par entité source)
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// La table complète, à plat
    pub fn values(&self) -> &[usize] {
        &self.values
    }

    /// Les `dim` cibles de l'entité source `elem`.
    pub fn row(&self, elem: usize) -> Option<&[usize]> {
        if elem >= self.from.size() {
            return None;
        }
        self.values.get(elem * self.dim..(elem + 1) * self.dim)
    }

    /// La cible sélectionnée pour `elem` (Map indexée uniquement).
    pub fn target(&self, elem: usize) -> Option<usize> {
        let index = self.index?;
        self.row(elem).map(|row| row[index])
    }

    /// Deux Maps partagent-elles la même table (même Map de base) ?
    pub fn same_table(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    pub fn repr(&self) -> String {
        let indexed = self.index.map(|i| format!("({})", i)).unwrap_or_default();
        format!(
            "Map({}, {}, {}, None, '{}'){}",
            self.from.repr(),
            self.to.repr(),
            self.dim,
            self.name,
            indexed
        )
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OP2 Map: {} from ({}) to ({}) with dim {}",
            self.name, self.from, self.to, self.dim
        )?;
        if let Some(index) = self.index {
            write!(f, " and component {}", index)?;
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

    /// Un segment de 4 nœuds et 3 arêtes
    fn line() -> (Set, Set, Map) {
        let nodes = Set::new(4, "nodes");
        let edges = Set::new(3, "edges");
        let m = Map::new(&edges, &nodes, 2, vec![0, 1, 1, 2, 2, 3], "edge2node").unwrap();
        (nodes, edges, m)
    }

    #[test]
    fn test_create_map() {
        let (nodes, edges, m) = line();
        assert_eq!(m.from_set(), &edges);
        assert_eq!(m.to_set(), &nodes);
        assert_eq!(m.dim(), 2);
        assert!(!m.is_indexed());
        assert_eq!(m.row(1), Some(&[1, 2][..]));
        assert_eq!(m.row(3), None);
    }

    #[test]
    fn test_table_shape_checked() {
        let s = Set::new(3, "s");
        let err = Map::new(&s, &s, 2, vec![0, 1, 2], "short").unwrap_err();
        assert!(matches!(err, Op2Error::ShapeMismatch { expected: 6, actual: 3, .. }));

        let err = Map::new(&s, &s, 0, vec![], "flat").unwrap_err();
        assert!(matches!(err, Op2Error::TypeConstraint(_)));
    }

    #[test]
    fn test_indexed_every_component() {
        let (_, _, m) = line();
        for i in 0..m.dim() {
            let mi = m.indexed(i).unwrap();
            assert_eq!(mi.index(), Some(i));
            assert!(mi.same_table(&m));
        }
        // La Map de base reste non indexée
        assert_eq!(m.index(), None);
        assert_eq!(m.indexed(1).unwrap().target(2), Some(3));
        assert_eq!(m.target(2), None);
    }

    #[test]
    fn test_index_out_of_range() {
        let s = Set::new(2, "s");
        let m = Map::new(&s, &s, 3, vec![0; 6], "m").unwrap();
        let err = m.indexed(3).unwrap_err();
        assert!(matches!(err, Op2Error::IndexRange { index: 3, dim: 3, .. }));
        assert!(m.indexed(2).is_ok());
    }

    #[test]
    fn test_reindex_fails() {
        let s = Set::new(2, "s");
        let m = Map::new(&s, &s, 3, vec![0; 6], "m").unwrap();
        let err = m.indexed(2).unwrap().indexed(0).unwrap_err();
        assert!(matches!(err, Op2Error::Reindex { index: 2, .. }));
    }

    #[test]
    fn test_oversized_set_rejected() {
        let huge = Set::new(usize::MAX, "huge");
        let err = Map::new(&huge, &huge, 2, vec![0], "m").unwrap_err();
        assert!(matches!(err, Op2Error::TypeConstraint(ref msg) if msg.contains("huge")));
    }

    #[test]
    fn test_map_renderings() {
        let s = Set::new(1, "s");
        let m = Map::new(&s, &s, 1, vec![0], "m").unwrap();
        insta::assert_snapshot!(
            m.to_string(),
            @"OP2 Map: m from (OP2 Set: s with size 1) to (OP2 Set: s with size 1) with dim 1"
        );
        // La composante 0 s'affiche aussi
        let m0 = m.indexed(0).unwrap();
        assert!(m0.to_string().ends_with("and component 0"));
        assert_eq!(m0.repr(), "Map(Set(1, 's'), Set(1, 's'), 1, None, 'm')(0)");
    }
}
