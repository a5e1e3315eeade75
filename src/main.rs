// =============================================================================
// OP2 : Point d'entrée : déclarer et inspecter un calcul sur maillage
// =============================================================================
//
// Sans argument, ce main.rs construit en Rust un petit maillage de quads :
//   1. Les Sets (nœuds, cellules)
//   2. Les Maps (cellule → nœuds, cellule → cellule)
//   3. Les données (Dat, Mat, Const, Global) et les Kernels
//   4. Les ParLoops (aire, assemblage, réduction)
//   5. La validation de chaque Map et de chaque boucle
//
// Avec un fichier, le même rapport est produit depuis une déclaration TOML :
//
//   op2 mesh.toml --json --log debug
//
// =============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use op2::core::validate;
use op2::{
    par_loop, Arg, Const, Dat, Declaration, Global, IterationSpace, Item, Kernel, Map, Mat,
    ParLoop, Result, Scalar, Set, INC, READ, WRITE,
};

#[derive(Parser, Debug)]
#[command(name = "op2", version, about = "Déclare et valide des boucles parallèles OP2")]
struct Cli {
    /// Fichier de déclaration TOML (par défaut : maillage de démonstration)
    file: Option<PathBuf>,

    /// Affiche les entités en JSON plutôt qu'en texte
    #[arg(long)]
    json: bool,

    /// Niveau de log si RUST_LOG n'est pas défini
    #[arg(long, default_value = "warn")]
    log: String,
}

/// Tout ce qu'on affiche, dans l'ordre des étapes.
#[derive(Debug, Default, Serialize)]
struct Report {
    sets: Vec<Set>,
    maps: Vec<Map>,
    carriers: Vec<Arg>,
    kernels: Vec<Kernel>,
    loops: Vec<ParLoop>,
}

impl From<&Declaration> for Report {
    fn from(decl: &Declaration) -> Self {
        Report {
            sets: decl.sets().cloned().collect(),
            maps: decl.maps().cloned().collect(),
            carriers: decl.carriers(),
            kernels: decl.kernels().cloned().collect(),
            loops: decl.loops().to_vec(),
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maillage 2 × 2 quads : 9 nœuds, 4 cellules.
///
///   6───7───8
///   │ 2 │ 3 │
///   3───4───5
///   │ 0 │ 1 │
///   0───1───2
fn quad_mesh() -> Result<Report> {
    let nodes = Set::new(9, "nodes");
    let cells = Set::new(4, "cells");

    #[rustfmt::skip]
    let cell2node = Map::new(&cells, &nodes, 4, vec![
        0, 1, 4, 3,
        1, 2, 5, 4,
        3, 4, 7, 6,
        4, 5, 8, 7,
    ], "cell2node")?;
    let cell2cell = Map::new(&cells, &cells, 1, vec![0, 1, 2, 3], "cell2cell")?;

    let spacing = Dat::new(&cells, 2, "double", Some(vec![Scalar::Real(0.5); 8]), "spacing")?;
    let area = Dat::new(&cells, 1, "double", None, "area")?;
    let stiffness = Mat::new(&cells, 1, "double", "K")?;
    let alpha = Const::new(1, "double", vec![Scalar::Real(1.0)], "alpha")?;
    let total = Global::with_value("total", 0.0);

    let area_k = Kernel::new("area", "void area(double *h, double *a) { *a = h[0] * h[1]; }");
    let assemble_k = Kernel::new(
        "assemble",
        "void assemble(double *K, double *a, double *alpha, int i, int j) { *K += *alpha * *a; }",
    );
    let sum_k = Kernel::new("sum", "void sum(double *a, double *t) { *t += *a; }");

    let loops = vec![
        par_loop(
            area_k.clone(),
            IterationSpace::new(&cells, Item::Absent)?,
            [
                Arg::from(spacing.bind(&cell2cell, READ)?),
                Arg::from(area.bind(&cell2cell, WRITE)?),
            ],
        ),
        par_loop(
            assemble_k.clone(),
            IterationSpace::new(&cells, [4i64, 4])?,
            [
                Arg::from(stiffness.bind((&cell2node, &cell2node), INC)?),
                Arg::from(area.bind(&cell2cell, READ)?),
                Arg::from(alpha.clone()),
            ],
        ),
        par_loop(
            sum_k.clone(),
            IterationSpace::new(&cells, Item::Absent)?,
            [
                Arg::from(area.bind(&cell2node.indexed(0)?, READ)?),
                Arg::from(total.bind(INC)?),
            ],
        ),
    ];

    Ok(Report {
        sets: vec![nodes, cells],
        maps: vec![cell2node, cell2cell],
        carriers: vec![
            Arg::from(spacing),
            Arg::from(area),
            Arg::from(stiffness),
            Arg::from(alpha),
            Arg::from(total),
        ],
        kernels: vec![area_k, assemble_k, sum_k],
        loops,
    })
}

fn print_text(report: &Report) {
    println!("═══ ÉTAPE 1 : Sets ═══\n");
    for s in &report.sets {
        println!("{}", s);
    }

    println!("\n═══ ÉTAPE 2 : Maps ═══\n");
    for m in &report.maps {
        println!("{}", m);
    }

    println!("\n═══ ÉTAPE 3 : Données et kernels ═══\n");
    for c in &report.carriers {
        println!("{}", c);
    }
    for k in &report.kernels {
        println!("{}", k);
    }

    println!("\n═══ ÉTAPE 4 : Boucles parallèles ═══\n");
    for l in &report.loops {
        println!("{}", l);
    }
}

/// Valide chaque Map et chaque boucle ; retourne le nombre de problèmes.
/// En mode JSON, le diagnostic part sur stderr pour garder stdout parsable.
fn report_validation(report: &Report, json: bool) -> usize {
    let say = |line: String| {
        if json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    };
    say("═══ ÉTAPE 5 : Validation ═══\n".to_string());
    let mut problems = 0;

    for m in &report.maps {
        match validate::validate_map(m) {
            Ok(()) => say(format!("✓ Map {} valide", m.name())),
            Err(errors) => {
                problems += errors.len();
                for e in errors {
                    say(format!("✗ {}", e));
                }
            }
        }
    }

    for l in &report.loops {
        match validate::validate_par_loop(l) {
            Ok(()) => say(format!("✓ Boucle {} valide", l.kernel().name())),
            Err(errors) => {
                problems += errors.len();
                for e in errors {
                    say(format!("✗ {}", e));
                }
            }
        }
    }

    problems
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let report = match &cli.file {
        Some(path) => Declaration::load(path).map(|decl| Report::from(&decl)),
        None => quad_mesh(),
    };
    let report = match report {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("✗ {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("╔══════════════════════════════════════════════════╗");
        println!("║      OP2 : Boucles parallèles sur maillages      ║");
        println!("╚══════════════════════════════════════════════════╝\n");
        print_text(&report);
        println!();
    }

    let problems = report_validation(&report, cli.json);
    if problems > 0 {
        tracing::warn!(problems, "validation reported problems");
    }
    ExitCode::SUCCESS
}
