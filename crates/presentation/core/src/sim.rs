//! Read-only views of the simulation.
//!
//! The simulation model lives outside the presentation layer. Renderers only
//! see it through these traits and never mutate it.

/// Terrain band of a tile, lowest to highest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Terrain {
    DeepWater,
    ShallowWater,
    Sand,
    #[default]
    Grass,
    Forest,
    Hills,
    Mountain,
    Snow,
}

impl Terrain {
    pub fn is_water(self) -> bool {
        matches!(self, Terrain::DeepWater | Terrain::ShallowWater)
    }
}

/// Plant growing on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlantKind {
    Grass,
    Bush,
    Tree,
    Cactus,
}

/// Feeding strategy of a creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Diet {
    #[default]
    Herbivore,
    Carnivore,
    Omnivore,
}

/// Everything a renderer needs to know about one tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileView {
    pub terrain: Terrain,
    /// Elevation scaled to `0..=255`.
    pub elevation: u8,
    pub plant: Option<PlantKind>,
    pub food: bool,
}

/// The world grid.
pub trait WorldView {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Tile at world coordinates; `None` outside the world.
    fn tile(&self, x: i32, y: i32) -> Option<TileView>;
}

/// One creature, as seen by the presentation layer.
pub trait CreatureView {
    fn id(&self) -> u64;
    /// World-space tile position.
    fn position(&self) -> (i32, i32);
    fn diet(&self) -> Diet;
    /// Normalised `0.0..=1.0`.
    fn energy(&self) -> f32;
    /// Normalised `0.0..=1.0`.
    fn hydration(&self) -> f32;
    /// Age in ticks.
    fn age(&self) -> u64;
    /// Short display name.
    fn label(&self) -> String {
        format!("{}#{}", self.diet(), self.id())
    }
}
