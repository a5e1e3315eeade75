// =============================================================================
// OP2 : Déclaration de boucles parallèles sur maillages non structurés
// =============================================================================
//
// Un calcul OP2 se décrit avec quelques objets :
//
//   Set      = un ensemble d'entités (nœuds, arêtes, cellules)
//   Map      = une connectivité Set → Set, `dim` cibles par entité
//   Dat      = des données attachées à chaque entité d'un Set
//   Mat      = une matrice creuse indexée par deux Sets
//   Const    = une constante globale en lecture seule
//   Global   = une réduction globale
//   Kernel   = le code appliqué à chaque entité
//   ParLoop  = Kernel × IterationSpace × arguments liés (Dat/Map/mode...)
//
// Architecture :
//   core/     → Le modèle et ses règles (construction, binding, validation)
//   declare/  → Le même modèle, déclaré dans un fichier TOML
//
// =============================================================================

pub mod core;
pub mod declare;

pub use crate::core::access::{Access, INC, READ, RW, WRITE};
pub use crate::core::carrier::DataCarrier;
pub use crate::core::constant::Const;
pub use crate::core::dat::Dat;
pub use crate::core::datatype::{Datatype, Scalar};
pub use crate::core::error::{Op2Error, Result};
pub use crate::core::global::Global;
pub use crate::core::iteration::IterationSpace;
pub use crate::core::kernel::Kernel;
pub use crate::core::map::Map;
pub use crate::core::mat::Mat;
pub use crate::core::par_loop::{par_loop, Arg, ParLoop};
pub use crate::core::set::Set;
pub use crate::core::tuple::{as_tuple, Item, Kind};
pub use crate::declare::Declaration;
