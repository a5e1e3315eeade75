// =============================================================================
// DATATYPE : Les types élémentaires des données OP2
// =============================================================================
//
// Chaque donnée (Dat, Mat, Const) déclare un type d'élément : "double",
// "float", "int"... Ce type est une ÉTIQUETTE opaque : le modèle ne fait
// aucune arithmétique, il transporte le type pour un futur générateur de
// kernels.
//
// Les valeurs concrètes (contenu d'un Dat, valeur d'un Const ou d'un
// Global) sont des Scalar : entier, réel ou booléen.
//
// =============================================================================

use std::fmt;

use serde::Serialize;

/// Le type d'élément déclaré pour une donnée.
///
/// Les noms usuels ont leur variante ; tout autre nom est conservé tel quel
/// dans `Custom` (par exemple un type utilisateur "vec3").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    /// Réel double précision (→ double en C)
    Double,
    /// Réel simple précision (→ float en C)
    Float,
    /// Entier signé (→ int en C)
    Int,
    /// Entier non signé (→ unsigned int en C)
    Uint,
    Bool,
    /// Type personnalisé, conservé verbatim
    #[serde(untagged)]
    Custom(String),
}

impl Datatype {
    /// Interprète un nom de type. Ne peut pas échouer : les noms inconnus
    /// deviennent `Custom`.
    pub fn parse(name: &str) -> Self {
        match name {
            "double" => Datatype::Double,
            "float" => Datatype::Float,
            "int" => Datatype::Int,
            "uint" | "unsigned int" => Datatype::Uint,
            "bool" => Datatype::Bool,
            other => Datatype::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Datatype::Double => "double",
            Datatype::Float => "float",
            Datatype::Int => "int",
            Datatype::Uint => "uint",
            Datatype::Bool => "bool",
            Datatype::Custom(name) => name,
        }
    }
}

impl From<&str> for Datatype {
    fn from(name: &str) -> Self {
        Datatype::parse(name)
    }
}

impl From<String> for Datatype {
    fn from(name: String) -> Self {
        Datatype::parse(&name)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Une valeur élémentaire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Real(f64),
    Bool(bool),
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Int(0)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Real(r) => write!(f, "{:?}", r),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Affiche une liste de valeurs : une seule valeur s'affiche nue,
/// plusieurs entre crochets.
pub(crate) fn fmt_values(values: &[Scalar]) -> String {
    match values {
        [single] => single.to_string(),
        many => {
            let items: Vec<String> = many.iter().map(|v| v.to_string()).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(Datatype::parse("double"), Datatype::Double);
        assert_eq!(Datatype::parse("unsigned int"), Datatype::Uint);
        assert_eq!(Datatype::parse("int").to_string(), "int");
    }

    #[test]
    fn test_custom_kept_verbatim() {
        let dt = Datatype::from("vec3");
        assert_eq!(dt, Datatype::Custom("vec3".into()));
        assert_eq!(dt.to_string(), "vec3");
        assert_eq!(serde_json::to_string(&dt).unwrap(), "\"vec3\"");
        assert_eq!(serde_json::to_string(&Datatype::Double).unwrap(), "\"double\"");
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::default().to_string(), "0");
        assert_eq!(Scalar::from(2.0).to_string(), "2.0");
        assert_eq!(fmt_values(&[Scalar::Int(1)]), "1");
        assert_eq!(fmt_values(&[Scalar::Int(1), Scalar::Bool(true)]), "[1, true]");
    }
}
