// =============================================================================
// SET : Un ensemble d'entités du maillage
// =============================================================================
//
// Un Set est une collection abstraite d'entités de maillage (cellules,
// arêtes, nœuds...) de cardinal fixé. Il ne contient rien d'autre : les
// données vivent dans les Dat, les relations dans les Map.
//
// IDENTITÉ : deux Sets de même nom et de même taille restent deux maillages
// DISTINCTS. L'égalité est donc une égalité d'identité (même handle), jamais
// une égalité de valeur. Chaque Set reçoit un SetId unique au processus.
//
//   let a = Set::new(10, "cells");
//   let b = Set::new(10, "cells");
//   a == a.clone()   → true   (même handle)
//   a == b           → false  (même forme, autre maillage)
//
// =============================================================================

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Identifiant unique d'un Set dans le processus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetId(u64);

impl SetId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Serialize)]
struct SetData {
    #[serde(skip)]
    id: SetId,
    name: String,
    size: usize,
}

/// Un Set OP2 : handle partagé, cloner ne crée pas de nouveau maillage.
#[derive(Debug, Clone)]
pub struct Set(Arc<SetData>);

impl Set {
    pub fn new(size: usize, name: impl Into<String>) -> Self {
        let set = Set(Arc::new(SetData {
            id: SetId::next(),
            name: name.into(),
            size,
        }));
        tracing::debug!(set = %set.name(), size, id = %set.id(), "set declared");
        set
    }

    pub fn id(&self) -> SetId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Nombre d'entités du set
    pub fn size(&self) -> usize {
        self.0.size
    }

    pub fn repr(&self) -> String {
        format!("Set({}, '{}')", self.size(), self.name())
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl Serialize for Set {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OP2 Set: {} with size {}", self.name(), self.size())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_set() {
        let s = Set::new(10, "elems");
        assert_eq!(s.size(), 10);
        assert_eq!(s.name(), "elems");
    }

    #[test]
    fn test_identity_equality() {
        let a = Set::new(10, "cells");
        let b = Set::new(10, "cells");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());

        let unique: HashSet<Set> = [a.clone(), a.clone(), b].into_iter().collect();
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_empty_set_allowed() {
        let s = Set::new(0, "ghosts");
        assert_eq!(s.size(), 0);
    }

    #[test]
    fn test_set_renderings() {
        let s = Set::new(10, "elems");
        insta::assert_snapshot!(s.to_string(), @"OP2 Set: elems with size 10");
        assert_eq!(s.repr(), "Set(10, 'elems')");
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            serde_json::json!({ "name": "elems", "size": 10 })
        );
    }
}
