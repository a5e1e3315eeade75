// =============================================================================
// ERROR : La taxonomie des erreurs du modèle OP2
// =============================================================================
//
// Toutes les erreurs sont détectées de façon synchrone, à la construction
// ou au moment d'un binding, et remontées immédiatement à l'appelant.
// Aucune reprise, aucun retry : une opération qui échoue ne produit rien.
//
// Les contrôles structurels "après coup" (validate.rs) ne passent PAS par
// ce type : ils accumulent des ValidationError au lieu d'échouer au premier
// problème.
//
// =============================================================================

use super::access::Access;

/// Erreurs du modèle de données OP2.
#[derive(Debug, thiserror::Error)]
pub enum Op2Error {
    /// Un argument ne respecte pas la contrainte de type attendue
    /// (taille non entière, nom qui n'est pas une chaîne, index non entier...).
    #[error("contrainte de type violée : {0}")]
    TypeConstraint(String),

    /// Un mode d'accès hors de {READ, WRITE, RW, INC}.
    #[error("mode d'accès inconnu '{mode}' : doit être l'un de [READ, WRITE, RW, INC]")]
    InvalidMode { mode: String },

    /// Un binding avec un mode non autorisé pour ce type de donnée.
    #[error("accès {} interdit pour {carrier} '{name}' : modes autorisés {allowed:?}", .access.mode())]
    InvalidAccess {
        carrier: &'static str,
        name: String,
        access: Access,
        allowed: &'static [Access],
    },

    /// Le set de départ d'une map ne correspond pas au set de la donnée.
    #[error("set invalide pour la map {map} (est {actual}, devrait être {expected})")]
    SetMismatch {
        map: String,
        actual: String,
        expected: String,
    },

    /// Une map déjà indexée ne peut pas être indexée une seconde fois.
    #[error("la map '{map}' est déjà indexée (composante {index})")]
    Reindex { map: String, index: usize },

    /// Index de composante hors de [0, dim).
    #[error("index {index} hors de l'intervalle [0,{}] pour la map '{map}'", .dim.saturating_sub(1))]
    IndexRange { map: String, index: i64, dim: usize },

    /// La normalisation en tuple n'a pas produit la longueur demandée.
    #[error("le tuple doit être de longueur {expected} (obtenu {actual})")]
    LengthMismatch { expected: usize, actual: usize },

    /// Un tableau de valeurs n'a pas la forme |set| × dim attendue.
    #[error("{what} : {expected} valeurs attendues, {actual} fournies")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Une déclaration référence un nom qui n'existe pas.
    #[error("{kind} '{name}' n'est pas déclaré")]
    UnknownName { kind: &'static str, name: String },

    /// Un nom est déclaré deux fois pour le même genre d'entité.
    #[error("{kind} '{name}' est déclaré deux fois")]
    DuplicateName { kind: &'static str, name: String },

    /// Syntaxe TOML invalide dans un fichier de déclaration.
    #[error("déclaration illisible : {0}")]
    Parse(#[from] toml::de::Error),

    #[error("erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Op2Error>;

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_range_message() {
        let err = Op2Error::IndexRange { map: "m".into(), index: 3, dim: 3 };
        insta::assert_snapshot!(err.to_string(), @"index 3 hors de l'intervalle [0,2] pour la map 'm'");
    }

    #[test]
    fn test_set_mismatch_names_everything() {
        let err = Op2Error::SetMismatch {
            map: "edge2node".into(),
            actual: "edges".into(),
            expected: "nodes".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("edge2node"));
        assert!(msg.contains("est edges"));
        assert!(msg.contains("devrait être nodes"));
    }
}
