//! The falling-sand material catalog.
//!
//! Ids are assigned in registration order, so the constants below must stay
//! in the same order as the definitions in [`registry`].

use sandtick_engine::material::{
    MaterialDef, MaterialId, MaterialRegistry, MatterClass, RegistryError,
};

pub const AIR: MaterialId = MaterialId(0);
pub const STEAM: MaterialId = MaterialId(1);
pub const WATER: MaterialId = MaterialId(2);
pub const STONE: MaterialId = MaterialId(3);
pub const SAND: MaterialId = MaterialId(4);
pub const BEDROCK: MaterialId = MaterialId(5);
pub const FIRE: MaterialId = MaterialId(6);
pub const SMOKE: MaterialId = MaterialId(7);
pub const CHARCOAL: MaterialId = MaterialId(8);
pub const WOOD: MaterialId = MaterialId(9);
pub const LEAVES: MaterialId = MaterialId(10);
pub const BRANCHES: MaterialId = MaterialId(11);
pub const DIRT: MaterialId = MaterialId(12);
pub const GRASS: MaterialId = MaterialId(13);

/// Build the catalog. Densities are in kg/m³.
pub fn registry() -> Result<MaterialRegistry, RegistryError> {
    use MatterClass::*;

    MaterialRegistry::builder()
        .material(MaterialDef::new("Air", Gas, 1.225).color(25, 25, 35))
        .material(MaterialDef::new("Steam", Gas, 0.6).color(200, 200, 255))
        .material(
            MaterialDef::new("Water", Liquid, 1000.0)
                .burns_into(STEAM)
                .color(50, 120, 200),
        )
        .material(MaterialDef::new("Stone", Solid, 2500.0).color(130, 135, 140))
        .material(MaterialDef::new("Sand", Powder, 1200.0).color(240, 210, 130))
        .material(MaterialDef::new("Bedrock", Solid, 2800.0).color(50, 50, 55))
        .material(MaterialDef::new("Fire", Gas, 0.3).color(255, 150, 20))
        .material(MaterialDef::new("Smoke", Gas, 1.1).color(185, 180, 175))
        .material(
            MaterialDef::new("Charcoal", Powder, 210.0)
                .burns_into(AIR)
                .color(80, 80, 80),
        )
        .material(
            MaterialDef::new("Wood", Solid, 750.0)
                .burns_into(CHARCOAL)
                .color(160, 110, 60),
        )
        .material(
            MaterialDef::new("Leaves", Solid, 150.0)
                .burns_into(SMOKE)
                .color(80, 160, 50),
        )
        .material(
            MaterialDef::new("Branches", Solid, 600.0)
                .burns_into(CHARCOAL)
                .color(130, 90, 40),
        )
        .material(MaterialDef::new("Dirt", Powder, 1250.0).color(150, 105, 75))
        .material(
            MaterialDef::new("Grass", Powder, 1150.0)
                .burns_into(SMOKE)
                .color(100, 180, 60),
        )
        .build()
}
