//! Material catalog: immutable per-material properties, indexed by id.
//!
//! The engine never interprets specific ids except `MaterialId::EMPTY` (0),
//! which is what unloaded space reads as. Game layers register their own
//! catalog through [`MaterialRegistry::builder`].

use serde::Serialize;
use thiserror::Error;

/// Opaque material identifier stored in every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// The universal "empty" material. Always the first registered entry.
    pub const EMPTY: MaterialId = MaterialId(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Default movement behavior of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatterClass {
    /// Never moves (stone, wood).
    Solid,
    /// Falls and piles up, never flows sideways (sand, dirt).
    Powder,
    /// Falls, settles and flows sideways (water).
    Liquid,
    /// Rises through denser material and drifts sideways (air, smoke).
    Gas,
}

/// Display color, only consumed by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// One entry of the catalog. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: &'static str,
    pub class: MatterClass,
    pub density: f64,
    /// What this turns into when consumed by fire. `None` = not burnable.
    pub burns_into: Option<MaterialId>,
    pub color: Option<Rgb>,
}

impl Material {
    pub fn is_solid(&self) -> bool {
        self.class == MatterClass::Solid
    }

    pub fn is_burnable(&self) -> bool {
        self.burns_into.is_some()
    }
}

/// Definition handed to the builder; the id is assigned on registration.
#[derive(Debug, Clone)]
pub struct MaterialDef {
    name: &'static str,
    class: MatterClass,
    density: f64,
    burns_into: Option<MaterialId>,
    color: Option<Rgb>,
}

impl MaterialDef {
    pub fn new(name: &'static str, class: MatterClass, density: f64) -> Self {
        Self {
            name,
            class,
            density,
            burns_into: None,
            color: None,
        }
    }

    pub fn burns_into(mut self, product: MaterialId) -> Self {
        self.burns_into = Some(product);
        self
    }

    pub fn color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = Some(Rgb(r, g, b));
        self
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("material registry is empty; the empty material (id 0) must be registered first")]
    Empty,
    #[error("material '{name}' burns into unknown material id {target}")]
    UnknownBurnProduct { name: &'static str, target: u16 },
    #[error("material '{name}' has non-finite density")]
    InvalidDensity { name: &'static str },
    #[error("duplicate material name '{0}'")]
    DuplicateName(&'static str),
    #[error("too many materials registered (limit {})", u16::MAX)]
    Overflow,
}

/// Array-backed lookup table, O(1) by id.
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn builder() -> MaterialRegistryBuilder {
        MaterialRegistryBuilder { defs: Vec::new() }
    }

    /// Look up a material. Panics on an id outside the registry: a cell can
    /// only ever hold a registered id, so this indicates a bug in a rule or
    /// caller.
    #[inline]
    pub fn get(&self, id: MaterialId) -> &Material {
        match self.materials.get(id.index()) {
            Some(material) => material,
            None => panic!(
                "material id {} is out of range (registry holds 0..{})",
                id.0,
                self.materials.len()
            ),
        }
    }

    pub fn try_get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        id.index() < self.materials.len()
    }

    pub fn by_name(&self, name: &str) -> Option<&Material> {
        self.materials
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn density(&self, id: MaterialId) -> f64 {
        self.get(id).density
    }

    #[inline]
    pub fn class(&self, id: MaterialId) -> MatterClass {
        self.get(id).class
    }

    #[inline]
    pub fn is_burnable(&self, id: MaterialId) -> bool {
        self.get(id).is_burnable()
    }

    #[inline]
    pub fn burn_product(&self, id: MaterialId) -> Option<MaterialId> {
        self.get(id).burns_into
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}

/// Explicit registration table. Ids follow registration order, so the
/// first definition becomes `MaterialId::EMPTY`.
pub struct MaterialRegistryBuilder {
    defs: Vec<MaterialDef>,
}

impl MaterialRegistryBuilder {
    pub fn material(mut self, def: MaterialDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Id the next registered material will receive.
    pub fn next_id(&self) -> MaterialId {
        MaterialId(self.defs.len() as u16)
    }

    pub fn build(self) -> Result<MaterialRegistry, RegistryError> {
        if self.defs.is_empty() {
            return Err(RegistryError::Empty);
        }
        if self.defs.len() > u16::MAX as usize {
            return Err(RegistryError::Overflow);
        }

        let count = self.defs.len();
        let mut materials = Vec::with_capacity(count);
        for (index, def) in self.defs.into_iter().enumerate() {
            if !def.density.is_finite() {
                return Err(RegistryError::InvalidDensity { name: def.name });
            }
            if materials.iter().any(|m: &Material| m.name == def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            if let Some(target) = def.burns_into {
                if target.index() >= count {
                    return Err(RegistryError::UnknownBurnProduct {
                        name: def.name,
                        target: target.0,
                    });
                }
            }
            materials.push(Material {
                id: MaterialId(index as u16),
                name: def.name,
                class: def.class,
                density: def.density,
                burns_into: def.burns_into,
                color: def.color,
            });
        }

        Ok(MaterialRegistry { materials })
    }
}
