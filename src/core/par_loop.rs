// =============================================================================
// PAR_LOOP : L'enregistrement d'une invocation de kernel
// =============================================================================
//
// Une ParLoop = un Kernel + un IterationSpace + une liste ordonnée
// d'arguments liés. C'est un ENREGISTREMENT : rien n'est exécuté, rien
// n'est réordonné, aucun résultat n'est produit. Les arguments sont stockés
// tels quels.
//
//   par_loop(res, edges_space, [
//       Arg::from(x.bind(&edge2node.indexed(0)?, READ)?),
//       Arg::from(total.bind(INC)?),
//   ])
//
// Un futur moteur consommera cet enregistrement (coloriage, dispatch...) ;
// validate::validate_par_loop permet déjà de vérifier sa cohérence.
//
// =============================================================================

use std::fmt;

use serde::Serialize;

use super::access::Access;
use super::carrier::DataCarrier;
use super::constant::Const;
use super::dat::Dat;
use super::global::Global;
use super::iteration::IterationSpace;
use super::kernel::Kernel;
use super::mat::Mat;

/// Un argument de boucle : l'une des quatre sortes de données.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Arg {
    Dat(Dat),
    Mat(Mat),
    Const(Const),
    Global(Global),
}

impl Arg {
    pub fn name(&self) -> &str {
        match self {
            Arg::Dat(d) => d.name(),
            Arg::Mat(m) => m.name(),
            Arg::Const(c) => c.name(),
            Arg::Global(g) => g.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Dat(_) => Dat::KIND,
            Arg::Mat(_) => Mat::KIND,
            Arg::Const(_) => Const::KIND,
            Arg::Global(_) => Global::KIND,
        }
    }

    pub fn access(&self) -> Option<Access> {
        match self {
            Arg::Dat(d) => d.access(),
            Arg::Mat(m) => m.access(),
            Arg::Const(c) => c.access(),
            Arg::Global(g) => g.access(),
        }
    }
}

impl From<Dat> for Arg {
    fn from(d: Dat) -> Self {
        Arg::Dat(d)
    }
}

impl From<Mat> for Arg {
    fn from(m: Mat) -> Self {
        Arg::Mat(m)
    }
}

impl From<Const> for Arg {
    fn from(c: Const) -> Self {
        Arg::Const(c)
    }
}

impl From<Global> for Arg {
    fn from(g: Global) -> Self {
        Arg::Global(g)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Dat(d) => fmt::Display::fmt(d, f),
            Arg::Mat(m) => fmt::Display::fmt(m, f),
            Arg::Const(c) => fmt::Display::fmt(c, f),
            Arg::Global(g) => fmt::Display::fmt(g, f),
        }
    }
}

/// Une invocation de kernel, sans exécution.
#[derive(Debug, Clone, Serialize)]
pub struct ParLoop {
    kernel: Kernel,
    it_space: IterationSpace,
    args: Vec<Arg>,
}

impl ParLoop {
    pub fn new(kernel: Kernel, it_space: IterationSpace, args: Vec<Arg>) -> Self {
        tracing::debug!(
            kernel = %kernel.name(),
            set = %it_space.set().name(),
            args = args.len(),
            "par_loop recorded"
        );
        ParLoop {
            kernel,
            it_space,
            args,
        }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn it_space(&self) -> &IterationSpace {
        &self.it_space
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

/// Enregistre une invocation de `kernel` sur `it_space`.
pub fn par_loop(
    kernel: Kernel,
    it_space: IterationSpace,
    args: impl IntoIterator<Item = Arg>,
) -> ParLoop {
    ParLoop::new(kernel, it_space, args.into_iter().collect())
}

impl fmt::Display for ParLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OP2 ParLoop: {} over {}", self.kernel, self.it_space)?;
        for (i, arg) in self.args.iter().enumerate() {
            writeln!(f, "  [{}] {}", i, arg)?;
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
    use crate::core::access::{INC, READ};
    use crate::core::datatype::Scalar;
    use crate::core::map::Map;
    use crate::core::set::Set;
    use crate::core::tuple::Item;

    #[test]
    fn test_args_stored_verbatim() {
        let nodes = Set::new(3, "nodes");
        let edges = Set::new(2, "edges");
        let e2n = Map::new(&edges, &nodes, 2, vec![0, 1, 1, 2], "e2n").unwrap();
        let w = Dat::new(&edges, 1, "double", None, "w").unwrap();
        let alpha = Const::new(1, "double", vec![Scalar::Real(2.0)], "alpha").unwrap();
        let total = Global::new("total");

        let l = par_loop(
            Kernel::new("k", "void k() {}"),
            IterationSpace::new(&edges, Item::Absent).unwrap(),
            [
                Arg::from(w.bind(&e2n.indexed(0).unwrap(), READ).unwrap()),
                Arg::from(alpha),
                Arg::from(total.bind(INC).unwrap()),
            ],
        );

        let names: Vec<&str> = l.args().iter().map(Arg::name).collect();
        assert_eq!(names, ["w", "alpha", "total"]);
        let kinds: Vec<&str> = l.args().iter().map(Arg::kind).collect();
        assert_eq!(kinds, ["Dat", "Const", "Global"]);
        let modes: Vec<Option<Access>> = l.args().iter().map(Arg::access).collect();
        assert_eq!(modes, [Some(READ), Some(READ), Some(INC)]);
        assert_eq!(l.kernel().name(), "k");
        assert_eq!(l.it_space().set(), &edges);
    }

    #[test]
    fn test_empty_loop() {
        let s = Set::new(1, "s");
        let l = ParLoop::new(
            Kernel::new("noop", ""),
            IterationSpace::new(&s, Item::Absent).unwrap(),
            Vec::new(),
        );
        assert!(l.args().is_empty());
        insta::assert_snapshot!(
            l.to_string().trim_end(),
            @"OP2 ParLoop: OP2 Kernel: noop over OP2 Iteration Space: OP2 Set: s with size 1 and extra dimensions ()"
        );
    }

    #[test]
    fn test_serialize_args_tagged() {
        let s = Set::new(1, "s");
        let l = par_loop(
            Kernel::new("k", ""),
            IterationSpace::new(&s, Item::Absent).unwrap(),
            [Arg::from(Global::new("g").bind(READ).unwrap())],
        );
        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["args"][0]["kind"], "global");
        assert_eq!(json["args"][0]["access"], "READ");
        assert_eq!(json["it_space"]["set"]["name"], "s");
    }
}
