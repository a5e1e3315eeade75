// =============================================================================
// CORE : Le modèle de données OP2
// =============================================================================
//
// Ce module regroupe toute la description d'un calcul sur maillage non
// structuré : pas d'exécution, pas de génération de code, uniquement des
// déclarations et leurs règles de cohérence.
//
// Architecture :
//   access     → les modes d'accès (READ, WRITE, RW, INC)
//   error      → l'erreur unique du crate
//   tuple      → as_tuple, normalisation des paramètres scalaires / séquences
//   datatype   → types élémentaires et valeurs scalaires
//   set        → les ensembles d'entités (nœuds, arêtes, cellules...)
//   map        → les tables de connectivité entre deux Sets
//   carrier    → le trait commun aux données passées à une boucle
//   dat        → données par entité d'un Set
//   mat        → matrices creuses indexées par une paire de Sets
//   constant   → constantes globales en lecture seule
//   global     → réductions globales (READ ou INC)
//   kernel     → le code utilisateur, opaque
//   iteration  → l'espace d'itération d'une boucle
//   par_loop   → l'enregistrement d'une invocation de kernel
//   validate   → la vérification de cohérence
//
// =============================================================================

pub mod access;
pub mod error;
pub mod tuple;
pub mod datatype;
pub mod set;
pub mod map;
pub mod carrier;
pub mod dat;
pub mod mat;
pub mod constant;
pub mod global;
pub mod kernel;
pub mod iteration;
pub mod par_loop;
pub mod validate;
