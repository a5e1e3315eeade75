// =============================================================================
// ACCESS : Les modes d'accès d'un argument de boucle parallèle
// =============================================================================
//
// Quand une donnée (Dat, Mat, Global) est passée à une boucle parallèle,
// on déclare COMMENT le kernel l'utilise :
//
//   READ   → lecture seule
//   WRITE  → écriture seule (l'ancienne valeur est ignorée)
//   RW     → lecture puis écriture
//   INC    → accumulation (incrément) : plusieurs éléments peuvent
//            contribuer à la même cible
//
// C'est un ensemble FERMÉ : un enum, pas une chaîne libre. Le seul point
// d'entrée faillible est le parsing depuis une chaîne (fichiers de
// déclaration, CLI).
//
// =============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::Op2Error;

/// Un mode d'accès OP2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Access {
    Read,
    Write,
    Rw,
    Inc,
}

pub const READ: Access = Access::Read;
pub const WRITE: Access = Access::Write;
pub const RW: Access = Access::Rw;
pub const INC: Access = Access::Inc;

impl Access {
    /// Les quatre modes, dans l'ordre canonique.
    pub const ALL: [Access; 4] = [READ, WRITE, RW, INC];

    /// Le nom du mode tel qu'il s'écrit dans une déclaration
    pub fn mode(&self) -> &'static str {
        match self {
            Access::Read => "READ",
            Access::Write => "WRITE",
            Access::Rw => "RW",
            Access::Inc => "INC",
        }
    }

    pub fn repr(&self) -> String {
        format!("Access('{}')", self.mode())
    }
}

impl FromStr for Access {
    type Err = Op2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Access::ALL
            .into_iter()
            .find(|a| a.mode() == s)
            .ok_or_else(|| Op2Error::InvalidMode { mode: s.to_string() })
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OP2 Access: {}", self.mode())
    }
}
