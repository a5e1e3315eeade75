// =============================================================================
// DECLARE : Construire un modèle OP2 depuis un fichier TOML
// =============================================================================
//
// Le cœur (core/) est une API Rust typée. Ce module permet de déclarer le
// même modèle sans écrire de Rust, dans un fichier TOML :
//
//   [[set]]
//   name = "nodes"
//   size = 4
//
//   [[map]]
//   name = "edge2node"
//   from = "edges"
//   to = "nodes"
//   dim = 2
//   values = [0, 1, 1, 2, 2, 3]
//
//   [[loop]]
//   kernel = "res"
//   set = "edges"
//   args = [
//     { dat = "x", map = "edge2node", index = 0, access = "READ" },
//     { global = "total", access = "INC" },
//   ]
//
// Les sections sont traitées dans l'ordre des dépendances (set, map, dat,
// mat, const, global, kernel, loop) : une référence pointe toujours vers
// quelque chose de déjà construit.
//
// C'est ICI que les contraintes de type dynamiques existent vraiment : un
// `size = "dix"` ou un `index = 1.5` donnent une TypeConstraint, avec les
// messages habituels ("Size must be of type int"...). Toutes les règles
// de binding et d'indexation du cœur s'appliquent ensuite telles quelles.
//
// =============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use toml::{Table, Value};

use crate::core::access::Access;
use crate::core::carrier::DataCarrier;
use crate::core::constant::Const;
use crate::core::dat::Dat;
use crate::core::datatype::Scalar;
use crate::core::error::{Op2Error, Result};
use crate::core::global::Global;
use crate::core::iteration::IterationSpace;
use crate::core::kernel::Kernel;
use crate::core::map::Map;
use crate::core::mat::Mat;
use crate::core::par_loop::{Arg, ParLoop};
use crate::core::set::Set;
use crate::core::tuple::{as_tuple, Item, Kind};

/// Les sections reconnues, dans l'ordre de traitement.
const SECTIONS: [&str; 8] = ["set", "map", "dat", "mat", "const", "global", "kernel", "loop"];

const TOML_INT: Kind<Value> = Kind {
    name: "int",
    accepts: |v| v.is_integer(),
};

const TOML_SCALAR: Kind<Value> = Kind {
    name: "int, float or bool",
    accepts: |v| v.is_integer() || v.is_float() || v.is_bool(),
};

const TOML_STR: Kind<Value> = Kind {
    name: "str",
    accepts: |v| v.is_str(),
};

/// Un modèle OP2 complet, construit depuis une déclaration.
#[derive(Debug, Default)]
pub struct Declaration {
    sets: BTreeMap<String, Set>,
    maps: BTreeMap<String, Map>,
    dats: BTreeMap<String, Dat>,
    mats: BTreeMap<String, Mat>,
    consts: BTreeMap<String, Const>,
    globals: BTreeMap<String, Global>,
    kernels: BTreeMap<String, Kernel>,
    loops: Vec<ParLoop>,
}

impl Declaration {
    /// Lit et construit une déclaration depuis un fichier.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let decl: Declaration = source.parse()?;
        tracing::info!(path = %path.display(), loops = decl.loops.len(), "declaration loaded");
        Ok(decl)
    }

    pub fn set(&self, name: &str) -> Option<&Set> {
        self.sets.get(name)
    }

    pub fn map(&self, name: &str) -> Option<&Map> {
        self.maps.get(name)
    }

    pub fn dat(&self, name: &str) -> Option<&Dat> {
        self.dats.get(name)
    }

    pub fn mat(&self, name: &str) -> Option<&Mat> {
        self.mats.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<&Const> {
        self.consts.get(name)
    }

    pub fn global(&self, name: &str) -> Option<&Global> {
        self.globals.get(name)
    }

    pub fn kernel(&self, name: &str) -> Option<&Kernel> {
        self.kernels.get(name)
    }

    pub fn sets(&self) -> impl Iterator<Item = &Set> {
        self.sets.values()
    }

    pub fn maps(&self) -> impl Iterator<Item = &Map> {
        self.maps.values()
    }

    /// Toutes les données déclarées (Dat, Mat, Const, Global), non liées.
    pub fn carriers(&self) -> Vec<Arg> {
        let dats = self.dats.values().cloned().map(Arg::from);
        let mats = self.mats.values().cloned().map(Arg::from);
        let consts = self.consts.values().cloned().map(Arg::from);
        let globals = self.globals.values().cloned().map(Arg::from);
        dats.chain(mats).chain(consts).chain(globals).collect()
    }

    pub fn kernels(&self) -> impl Iterator<Item = &Kernel> {
        self.kernels.values()
    }

    /// Les boucles, dans l'ordre de déclaration
    pub fn loops(&self) -> &[ParLoop] {
        &self.loops
    }

    /// Construit le modèle depuis une table TOML déjà parsée.
    pub fn from_table(doc: &Table) -> Result<Self> {
        if let Some(unknown) = doc.keys().find(|k| !SECTIONS.contains(&k.as_str())) {
            return Err(Op2Error::UnknownName { kind: "section", name: unknown.clone() });
        }

        let mut decl = Declaration::default();
        for t in entries(doc, "set")? {
            let name = name_field(t)?;
            let size = t.get("size").ok_or_else(|| missing("set", name, "size"))?;
            let size = match size.as_integer() {
                Some(n) if n >= 0 => n as usize,
                Some(_) => return Err(type_error("set", name, "Size must be a non-negative int")),
                None => return Err(type_error("set", name, "Size must be of type int")),
            };
            insert_unique(&mut decl.sets, "set", name, Set::new(size, name))?;
        }

        for t in entries(doc, "map")? {
            let name = name_field(t)?;
            let from = lookup(&decl.sets, "set", str_field(t, "map", name, "from")?)?;
            let to = lookup(&decl.sets, "set", str_field(t, "map", name, "to")?)?;
            let dim = usize_field(t, "map", name, "dim")?;
            let values = usize_array(t.get("values"), "map", name, "values")?;
            let map = Map::new(from, to, dim, values, name)?;
            insert_unique(&mut decl.maps, "map", name, map)?;
        }

        for t in entries(doc, "dat")? {
            let name = name_field(t)?;
            let set = lookup(&decl.sets, "set", str_field(t, "dat", name, "set")?)?;
            let dim = usize_field(t, "dat", name, "dim")?;
            let datatype = str_field(t, "dat", name, "datatype")?;
            let data = match t.get("data") {
                Some(v) => Some(scalars(v, "dat", name)?),
                None => None,
            };
            let dat = Dat::new(set, dim, datatype, data, name)?;
            insert_unique(&mut decl.dats, "dat", name, dat)?;
        }

        for t in entries(doc, "mat")? {
            let name = name_field(t)?;
            let set_names = as_tuple::<Value>(item(t.get("sets")), Some(&TOML_STR), Some(2))?;
            let sets = set_names
                .iter()
                .filter_map(Value::as_str)
                .map(|s| lookup(&decl.sets, "set", s).cloned())
                .collect::<Result<Vec<_>>>()?;
            let dim = usize_field(t, "mat", name, "dim")?;
            let datatype = str_field(t, "mat", name, "datatype")?;
            let mat = Mat::new(sets, dim, datatype, name)?;
            insert_unique(&mut decl.mats, "mat", name, mat)?;
        }

        for t in entries(doc, "const")? {
            let name = name_field(t)?;
            let dim = usize_field(t, "const", name, "dim")?;
            let datatype = str_field(t, "const", name, "datatype")?;
            let value = t.get("value").ok_or_else(|| missing("const", name, "value"))?;
            let value = scalars(value, "const", name)?;
            let constant = Const::new(dim, datatype, value, name)?;
            insert_unique(&mut decl.consts, "const", name, constant)?;
        }

        for t in entries(doc, "global")? {
            let name = name_field(t)?;
            let global = match t.get("val") {
                None => Global::new(name),
                Some(v) => match scalars(v, "global", name)?.as_slice() {
                    [val] => Global::with_value(name, *val),
                    _ => return Err(type_error("global", name, "Val must be a single value")),
                },
            };
            insert_unique(&mut decl.globals, "global", name, global)?;
        }

        for t in entries(doc, "kernel")? {
            let name = name_field(t)?;
            let code = str_field(t, "kernel", name, "code")?;
            insert_unique(&mut decl.kernels, "kernel", name, Kernel::new(name, code))?;
        }

        for (i, t) in entries(doc, "loop")?.into_iter().enumerate() {
            let l = decl.par_loop(i, t)?;
            decl.loops.push(l);
        }

        Ok(decl)
    }

    fn par_loop(&self, i: usize, t: &Table) -> Result<ParLoop> {
        let label = format!("#{}", i);
        let kernel = lookup(&self.kernels, "kernel", str_field(t, "loop", &label, "kernel")?)?;
        let set = lookup(&self.sets, "set", str_field(t, "loop", &label, "set")?)?;
        let dims = as_tuple::<Value>(item(t.get("dims")), Some(&TOML_INT), None)?
            .iter()
            .filter_map(Value::as_integer)
            .collect::<Vec<i64>>();
        let it_space = IterationSpace::new(set, dims)?;

        let args = match t.get("args") {
            None => Vec::new(),
            Some(Value::Array(args)) => args
                .iter()
                .map(|a| match a {
                    Value::Table(a) => self.arg(&label, a),
                    _ => Err(type_error("loop", &label, "Args must be tables")),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(type_error("loop", &label, "Args must be of type list")),
        };

        Ok(ParLoop::new(kernel.clone(), it_space, args))
    }

    fn arg(&self, label: &str, a: &Table) -> Result<Arg> {
        let kinds: Vec<&str> = ["dat", "mat", "const", "global"]
            .into_iter()
            .filter(|k| a.contains_key(*k))
            .collect();
        let [kind] = kinds.as_slice() else {
            return Err(type_error(
                "loop",
                label,
                "each argument must name exactly one of dat, mat, const, global",
            ));
        };
        let name = str_field(a, "loop", label, kind)?;

        match *kind {
            "dat" => {
                let dat = lookup(&self.dats, "dat", name)?;
                let map = lookup(&self.maps, "map", str_field(a, "loop", label, "map")?)?;
                let map = select(map, a.get("index"))?;
                Ok(dat.bind(&map, access_field(a, label)?)?.into())
            }
            "mat" => {
                let mat = lookup(&self.mats, "mat", name)?;
                let names = as_tuple::<Value>(item(a.get("maps")), Some(&TOML_STR), Some(2))?;
                let indices = match a.get("indices") {
                    None => vec![None, None],
                    Some(v) => as_tuple::<Value>(item(Some(v)), None, Some(2))?
                        .into_iter()
                        .map(Some)
                        .collect(),
                };
                let mut maps = Vec::with_capacity(2);
                for (map_name, index) in names.iter().filter_map(Value::as_str).zip(&indices) {
                    let map = lookup(&self.maps, "map", map_name)?;
                    maps.push(select(map, index.as_ref())?);
                }
                let [row, col] = maps.as_slice() else {
                    return Err(Op2Error::LengthMismatch { expected: 2, actual: maps.len() });
                };
                Ok(mat.bind((row, col), access_field(a, label)?)?.into())
            }
            "const" => {
                let constant = lookup(&self.consts, "const", name)?;
                if a.contains_key("access") {
                    constant.check_access(access_field(a, label)?)?;
                }
                Ok(constant.clone().into())
            }
            _ => {
                let global = lookup(&self.globals, "global", name)?;
                Ok(global.bind(access_field(a, label)?)?.into())
            }
        }
    }
}

impl FromStr for Declaration {
    type Err = Op2Error;

    fn from_str(s: &str) -> Result<Self> {
        let doc: Table = s.parse()?;
        Declaration::from_table(&doc)
    }
}

// -----------------------------------------------------------------------------
// Lecture des champs
// -----------------------------------------------------------------------------

fn entries<'a>(doc: &'a Table, section: &str) -> Result<Vec<&'a Table>> {
    match doc.get(section) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_table().ok_or_else(|| {
                    Op2Error::TypeConstraint(format!("[[{}]] doit être un tableau de tables", section))
                })
            })
            .collect(),
        Some(_) => Err(Op2Error::TypeConstraint(format!(
            "[[{}]] doit être un tableau de tables",
            section
        ))),
    }
}

fn missing(kind: &str, name: &str, field: &str) -> Op2Error {
    Op2Error::TypeConstraint(format!("{} '{}' : champ '{}' manquant", kind, name, field))
}

fn type_error(kind: &str, name: &str, message: &str) -> Op2Error {
    Op2Error::TypeConstraint(format!("{} '{}' : {}", kind, name, message))
}

/// "from" → "From", pour les messages "From must be of type str"
fn capitalized(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn name_field(t: &Table) -> Result<&str> {
    match t.get("name") {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(Op2Error::TypeConstraint("Name must be of type str".into())),
        None => Err(Op2Error::TypeConstraint("champ 'name' manquant".into())),
    }
}

fn str_field<'a>(t: &'a Table, kind: &str, name: &str, field: &str) -> Result<&'a str> {
    let v = t.get(field).ok_or_else(|| missing(kind, name, field))?;
    v.as_str().ok_or_else(|| {
        type_error(kind, name, &format!("{} must be of type str", capitalized(field)))
    })
}

fn usize_field(t: &Table, kind: &str, name: &str, field: &str) -> Result<usize> {
    let v = t.get(field).ok_or_else(|| missing(kind, name, field))?;
    match v.as_integer() {
        Some(n) if n >= 0 => Ok(n as usize),
        _ => Err(type_error(
            kind,
            name,
            &format!("{} must be a non-negative int", capitalized(field)),
        )),
    }
}

fn usize_array(v: Option<&Value>, kind: &str, name: &str, field: &str) -> Result<Vec<usize>> {
    let v = v.ok_or_else(|| missing(kind, name, field))?;
    let Value::Array(items) = v else {
        return Err(type_error(kind, name, &format!("{} must be of type list", capitalized(field))));
    };
    items
        .iter()
        .map(|x| match x.as_integer() {
            Some(n) if n >= 0 => Ok(n as usize),
            _ => Err(type_error(
                kind,
                name,
                &format!("{} must contain non-negative ints", capitalized(field)),
            )),
        })
        .collect()
}

fn item(v: Option<&Value>) -> Item<Value> {
    match v {
        None => Item::Absent,
        Some(Value::Array(items)) => Item::Seq(items.clone()),
        Some(x) => Item::Scalar(x.clone()),
    }
}

fn scalars(v: &Value, kind: &str, name: &str) -> Result<Vec<Scalar>> {
    let values = as_tuple::<Value>(item(Some(v)), Some(&TOML_SCALAR), None)
        .map_err(|e| type_error(kind, name, &e.to_string()))?;
    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            Value::Integer(i) => Some(Scalar::Int(i)),
            Value::Float(f) => Some(Scalar::Real(f)),
            Value::Boolean(b) => Some(Scalar::Bool(b)),
            _ => None,
        })
        .collect())
}

fn access_field(a: &Table, label: &str) -> Result<Access> {
    str_field(a, "loop", label, "access")?.parse()
}

/// Applique l'index optionnel d'un argument à sa Map.
fn select(map: &Map, index: Option<&Value>) -> Result<Map> {
    match index {
        None => Ok(map.clone()),
        Some(Value::Integer(i)) if *i < 0 => Err(Op2Error::IndexRange {
            map: map.name().to_string(),
            index: *i,
            dim: map.dim(),
        }),
        Some(Value::Integer(i)) => map.indexed(*i as usize),
        Some(_) => Err(Op2Error::TypeConstraint("Only integer indices are allowed".into())),
    }
}

fn lookup<'a, T>(items: &'a BTreeMap<String, T>, kind: &'static str, name: &str) -> Result<&'a T> {
    items.get(name).ok_or_else(|| Op2Error::UnknownName {
        kind,
        name: name.to_string(),
    })
}

fn insert_unique<T>(
    items: &mut BTreeMap<String, T>,
    kind: &'static str,
    name: &str,
    value: T,
) -> Result<()> {
    if items.contains_key(name) {
        return Err(Op2Error::DuplicateName { kind, name: name.to_string() });
    }
    items.insert(name.to_string(), value);
    Ok(())
}
