// =============================================================================
// VALIDATE : Vérification de cohérence après construction
// =============================================================================
//
// Les constructeurs vérifient ce qui est local (forme des tableaux, modes,
// sets des maps liées). Ce module vérifie ce qui demande une vue
// d'ensemble, et rapporte TOUS les problèmes au lieu du premier :
//
//   - Une Map est bien formée : chaque entrée de sa table est < |to|
//   - Une ParLoop est cohérente :
//       * chaque Dat/Mat/Global est lié à un mode d'accès
//       * chaque Dat/Mat vit sur le Set d'itération (ses maps partent donc
//         du Set d'itération)
//       * chaque Map atteinte par les arguments est bien formée
//
// Rien n'est exécuté, rien n'est modifié.
//
// =============================================================================

use super::map::Map;
use super::par_loop::{Arg, ParLoop};
use super::set::Set;

/// Erreur de validation
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation error: {}", self.message)
    }
}

fn collect_map_errors(map: &Map, errors: &mut Vec<ValidationError>) {
    let bound = map.to_set().size();
    for (pos, &target) in map.values().iter().enumerate() {
        if target >= bound {
            errors.push(ValidationError {
                message: format!(
                    "Map '{}' : l'entité {} (colonne {}) pointe vers {}[{}] qui n'existe pas",
                    map.name(),
                    pos / map.dim(),
                    pos % map.dim(),
                    map.to_set().name(),
                    target
                ),
            });
        }
    }
}

/// Vérifie que chaque entrée de la table d'une Map désigne une entité du Set cible.
pub fn validate_map(map: &Map) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    collect_map_errors(map, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Vérifie qu'une ParLoop est cohérente avec son espace d'itération.
pub fn validate_par_loop(l: &ParLoop) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let it_set = l.it_space().set();
    // Une table partagée par plusieurs arguments n'est vérifiée qu'une fois
    let mut seen: Vec<Map> = Vec::new();
    let mut check_map = |map: &Map, errors: &mut Vec<ValidationError>| {
        if !seen.iter().any(|m| m.same_table(map)) {
            collect_map_errors(map, errors);
            seen.push(map.clone());
        }
    };

    let on_it_set = |i: usize, arg: &Arg, set: &Set, errors: &mut Vec<ValidationError>| {
        if set != it_set {
            errors.push(ValidationError {
                message: format!(
                    "argument {} ({} '{}') : défini sur '{}' mais la boucle itère sur '{}'",
                    i,
                    arg.kind(),
                    arg.name(),
                    set.name(),
                    it_set.name()
                ),
            });
        }
    };

    for (i, arg) in l.args().iter().enumerate() {
        if arg.access().is_none() {
            errors.push(ValidationError {
                message: format!(
                    "argument {} ({} '{}') : aucun mode d'accès",
                    i,
                    arg.kind(),
                    arg.name()
                ),
            });
        }

        match arg {
            Arg::Dat(d) => {
                on_it_set(i, arg, d.set(), &mut errors);
                if let Some(map) = d.map() {
                    check_map(map, &mut errors);
                }
            }
            Arg::Mat(m) => {
                on_it_set(i, arg, m.row_set(), &mut errors);
                // Une Mat carrée ne signale qu'une fois
                if m.col_set() != m.row_set() {
                    on_it_set(i, arg, m.col_set(), &mut errors);
                }
                if let Some((row, col)) = m.maps() {
                    check_map(row, &mut errors);
                    check_map(col, &mut errors);
                }
            }
            Arg::Const(_) | Arg::Global(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::warn!(
            kernel = %l.kernel().name(),
            problems = errors.len(),
            "par_loop failed validation"
        );
        Err(errors)
    }
}
