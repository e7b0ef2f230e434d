//! Toy ecosystem the viewer animates.
//!
//! Terrain comes from a few layered sine waves so every seed is reproducible
//! without a noise crate. Creatures wander, get hungry and thirsty, and die;
//! the HUD counters follow them.
use presentation_core::{
    CreatureView, DeathStats, Diet, HudData, PlantKind, Terrain, TileView, WorldDetails,
    WorldView,
};

const MAX_AGE: u64 = 2_000;

/// Generator parameters; the world editor keys tune these.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub seed: u64,
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub frequency: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 7,
            scale: 1.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            frequency: 0.045,
        }
    }
}

pub struct Critter {
    id: u64,
    position: (i32, i32),
    heading: (i32, i32),
    diet: Diet,
    energy: f32,
    hydration: f32,
    age: u64,
}

impl CreatureView for Critter {
    fn id(&self) -> u64 {
        self.id
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn diet(&self) -> Diet {
        self.diet
    }

    fn energy(&self) -> f32 {
        self.energy
    }

    fn hydration(&self) -> f32 {
        self.hydration
    }

    fn age(&self) -> u64 {
        self.age
    }
}

pub struct Ecosystem {
    width: u32,
    height: u32,
    params: Params,
    /// Terrain level offset `1..=9` the editor is working on.
    terrain_level: u8,
    tiles: Vec<TileView>,
    critters: Vec<Critter>,
    next_id: u64,
    rng: u64,
    ticks: u64,
    births: u64,
    food_eaten: u64,
    deaths: DeathStats,
}

impl Ecosystem {
    pub fn new(width: u32, height: u32, params: Params) -> Self {
        let mut world = Self {
            width,
            height,
            rng: params.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1,
            params,
            terrain_level: 5,
            tiles: Vec::new(),
            critters: Vec::new(),
            next_id: 1,
            ticks: 0,
            births: 0,
            food_eaten: 0,
            deaths: DeathStats::default(),
        };
        world.regenerate();
        for _ in 0..24 {
            world.spawn();
        }
        world
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn set_terrain_level(&mut self, level: u8) {
        self.terrain_level = level.clamp(1, 9);
    }

    /// Rebuilds the terrain from the current parameters.
    pub fn regenerate(&mut self) {
        let mut tiles = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let elevation = self.elevation(x, y);
                let terrain = terrain_for(elevation);
                let plant = self.plant_for(x, y, terrain);
                tiles.push(TileView {
                    terrain,
                    elevation: (elevation * 255.0) as u8,
                    plant,
                    food: plant.is_some() && (x + y) % 7 == 0,
                });
            }
        }
        self.tiles = tiles;
        tracing::debug!(params = ?self.params, "terrain regenerated");
    }

    pub fn critters(&self) -> &[Critter] {
        &self.critters
    }

    pub fn center(&self) -> (i32, i32) {
        (self.width as i32 / 2, self.height as i32 / 2)
    }

    /// Advances the simulation one tick.
    pub fn step(&mut self) {
        self.ticks += 1;

        let mut moves = Vec::with_capacity(self.critters.len());
        for _ in 0..self.critters.len() {
            moves.push(self.next_random() % 8 == 0);
        }

        let (width, height) = (self.width as i32, self.height as i32);
        let tiles = &self.tiles;
        let mut eaten = 0;
        for (critter, turn) in self.critters.iter_mut().zip(moves) {
            if turn {
                critter.heading = (critter.heading.1, -critter.heading.0);
            }
            let next = (
                critter.position.0 + critter.heading.0,
                critter.position.1 + critter.heading.1,
            );
            if next.0 < 0 || next.1 < 0 || next.0 >= width || next.1 >= height {
                critter.heading = (-critter.heading.0, -critter.heading.1);
            } else {
                critter.position = next;
            }

            critter.age += 1;
            critter.energy = (critter.energy - 0.002).max(0.0);
            critter.hydration = (critter.hydration - 0.003).max(0.0);

            let index = (critter.position.1 * width + critter.position.0) as usize;
            if let Some(tile) = tiles.get(index) {
                if tile.terrain.is_water() {
                    critter.hydration = 1.0;
                }
                if tile.food {
                    critter.energy = (critter.energy + 0.2).min(1.0);
                    eaten += 1;
                }
            }
        }
        self.food_eaten += eaten;

        let before = self.critters.len();
        let deaths = &mut self.deaths;
        self.critters.retain(|critter| {
            let cause = if critter.age > MAX_AGE {
                &mut deaths.old_age
            } else if critter.energy <= 0.0 {
                &mut deaths.starved
            } else if critter.hydration <= 0.0 {
                &mut deaths.dehydrated
            } else {
                return true;
            };
            *cause += 1;
            false
        });
        if self.critters.len() < before {
            tracing::debug!(died = before - self.critters.len(), "critters died");
        }

        if self.ticks % 40 == 0 && self.critters.len() < 64 {
            self.spawn();
            self.births += 1;
        }
    }

    pub fn hud(&self, viewport: (i32, i32), tick_rate: f32, paused: bool) -> HudData {
        let day = self.ticks / 240;
        let minutes = (self.ticks % 240) * 6;
        HudData {
            population: self.critters.len() as u32,
            births: self.births,
            food_eaten: self.food_eaten,
            deaths: self.deaths,
            time: format!("{:02}:{:02}", minutes / 60, minutes % 60),
            date: format!("Day {}", day + 1),
            world_width: self.width,
            world_height: self.height,
            viewport_x: viewport.0,
            viewport_y: viewport.1,
            tick_rate,
            paused,
        }
    }

    pub fn details(&self) -> WorldDetails {
        WorldDetails {
            seed: self.params.seed,
            scale: self.params.scale,
            octaves: self.params.octaves,
            persistence: self.params.persistence,
            lacunarity: self.params.lacunarity,
            frequency: self.params.frequency,
            terrain_level: self.terrain_level,
            world_width: self.width,
            world_height: self.height,
        }
    }

    fn spawn(&mut self) {
        let roll = self.next_random();
        let position = (
            (roll % u64::from(self.width)) as i32,
            ((roll >> 20) % u64::from(self.height)) as i32,
        );
        let diet = match roll % 5 {
            0 => Diet::Carnivore,
            1 => Diet::Omnivore,
            _ => Diet::Herbivore,
        };
        let heading = [(1, 0), (0, 1), (-1, 0), (0, -1)][((roll >> 8) % 4) as usize];
        self.critters.push(Critter {
            id: self.next_id,
            position,
            heading,
            diet,
            energy: 1.0,
            hydration: 1.0,
            age: 0,
        });
        self.next_id += 1;
    }

    fn elevation(&self, x: i32, y: i32) -> f32 {
        let params = &self.params;
        let phase = (params.seed % 1_000) as f32 * 0.37;
        let (mut amplitude, mut frequency) = (1.0_f32, params.frequency / params.scale.max(0.05));
        let (mut total, mut norm) = (0.0_f32, 0.0_f32);
        for _ in 0..params.octaves.max(1) {
            let (fx, fy) = (x as f32 * frequency, y as f32 * frequency);
            total += amplitude * ((fx + phase).sin() * (fy * 1.3 - phase).cos());
            norm += amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }
        let shift = (f32::from(self.terrain_level) - 5.0) * 0.04;
        ((total / norm + 1.0) / 2.0 + shift).clamp(0.0, 1.0)
    }

    fn plant_for(&self, x: i32, y: i32, terrain: Terrain) -> Option<PlantKind> {
        let hash = (x as u64)
            .wrapping_mul(73_856_093)
            ^ (y as u64).wrapping_mul(19_349_663)
            ^ self.params.seed;
        if hash % 9 != 0 {
            return None;
        }
        match terrain {
            Terrain::Sand => Some(PlantKind::Cactus),
            Terrain::Grass => Some(PlantKind::Grass),
            Terrain::Forest => Some(PlantKind::Tree),
            Terrain::Hills => Some(PlantKind::Bush),
            _ => None,
        }
    }

    fn next_random(&mut self) -> u64 {
        // xorshift64
        self.rng ^= self.rng << 13;
        self.rng ^= self.rng >> 7;
        self.rng ^= self.rng << 17;
        self.rng
    }
}

impl WorldView for Ecosystem {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tile(&self, x: i32, y: i32) -> Option<TileView> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.tiles.get((y as u32 * self.width + x as u32) as usize).copied()
    }
}

fn terrain_for(elevation: f32) -> Terrain {
    match elevation {
        e if e < 0.28 => Terrain::DeepWater,
        e if e < 0.36 => Terrain::ShallowWater,
        e if e < 0.40 => Terrain::Sand,
        e if e < 0.58 => Terrain::Grass,
        e if e < 0.70 => Terrain::Forest,
        e if e < 0.80 => Terrain::Hills,
        e if e < 0.90 => Terrain::Mountain,
        _ => Terrain::Snow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_terrain() {
        let a = Ecosystem::new(32, 16, Params::default());
        let b = Ecosystem::new(32, 16, Params::default());
        assert_eq!(a.tile(10, 5), b.tile(10, 5));
        assert!(a.tile(32, 0).is_none());
        assert!(a.tile(-1, 0).is_none());
    }

    #[test]
    fn deaths_and_population_are_accounted() {
        let mut world = Ecosystem::new(24, 24, Params::default());
        let start = world.critters().len() as u64;
        for _ in 0..3_000 {
            world.step();
        }
        let hud = world.hud((0, 0), 10.0, false);
        assert_eq!(
            u64::from(hud.population) + hud.deaths.total(),
            start + hud.births
        );
    }

    #[test]
    fn critters_stay_inside_world() {
        let mut world = Ecosystem::new(8, 8, Params::default());
        for _ in 0..500 {
            world.step();
            assert!(world.critters().iter().all(|c| {
                let (x, y) = c.position();
                (0..8).contains(&x) && (0..8).contains(&y)
            }));
        }
    }
}
