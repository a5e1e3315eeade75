// =============================================================================
// CARRIER : Ce qu'ont en commun toutes les données OP2
// =============================================================================
//
// Quatre sortes de données peuvent apparaître comme arguments d'une boucle
// parallèle :
//
//   Dat     → une valeur par entité d'un Set        modes : READ WRITE RW INC
//   Mat     → une valeur par couple (ligne, colonne) modes : READ WRITE RW INC
//   Const   → une valeur partagée, toujours lue      mode  : READ
//   Global  → une valeur unique, lue ou accumulée    modes : READ INC
//
// Le binding ("d(m, READ)") est propre à chaque variante (Dat prend une Map,
// Mat une paire, Global rien) ; le trait ne porte que le contrat commun :
// un nom, des modes autorisés, l'accès courant et la vérification du mode.
//
// =============================================================================

use super::access::Access;
use super::error::{Op2Error, Result};

/// Capacité commune des données liables à un mode d'accès.
pub trait DataCarrier {
    /// Nom de la variante, pour les messages ("Dat", "Global"...)
    const KIND: &'static str;

    /// Les modes qu'un binding peut demander
    const MODES: &'static [Access];

    fn name(&self) -> &str;

    /// Le mode attaché par le dernier binding (None tant que non liée)
    fn access(&self) -> Option<Access>;

    fn is_bound(&self) -> bool {
        self.access().is_some()
    }

    /// Vérifie qu'un binding avec `access` est permis pour cette donnée.
    fn check_access(&self, access: Access) -> Result<()> {
        if Self::MODES.contains(&access) {
            Ok(())
        } else {
            Err(Op2Error::InvalidAccess {
                carrier: Self::KIND,
                name: self.name().to_string(),
                access,
                allowed: Self::MODES,
            })
        }
    }
}
