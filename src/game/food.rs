use super::constants::{GRID_HEIGHT, GRID_WIDTH, MAX_FOOD_SAMPLE_ATTEMPTS};
use super::snake::Snake;
use super::types::{Cell, FoodSnapshot};
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Normal,
    Speed,
    Invincible,
    Super,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUp {
    SpeedBoost,
    Invincible,
    Shield,
}

#[derive(Debug, Clone, Copy)]
pub struct FoodSpec {
    pub kind: FoodKind,
    pub weight: u32,
    pub growth: u32,
    pub effect: Option<PowerUp>,
    pub color: &'static str,
}

pub const FOOD_CATALOG: [FoodSpec; 5] = [
    FoodSpec {
        kind: FoodKind::Normal,
        weight: 70,
        growth: 1,
        effect: None,
        color: "#ff4444",
    },
    FoodSpec {
        kind: FoodKind::Speed,
        weight: 10,
        growth: 1,
        effect: Some(PowerUp::SpeedBoost),
        color: "#ffd166",
    },
    FoodSpec {
        kind: FoodKind::Invincible,
        weight: 5,
        growth: 1,
        effect: Some(PowerUp::Invincible),
        color: "#b197fc",
    },
    FoodSpec {
        kind: FoodKind::Super,
        weight: 10,
        growth: 3,
        effect: None,
        color: "#ff922b",
    },
    FoodSpec {
        kind: FoodKind::Shield,
        weight: 5,
        growth: 1,
        effect: Some(PowerUp::Shield),
        color: "#4dabf7",
    },
];

impl FoodKind {
    pub fn spec(self) -> &'static FoodSpec {
        FOOD_CATALOG
            .iter()
            .find(|spec| spec.kind == self)
            .unwrap_or(&FOOD_CATALOG[0])
    }

    /// Cumulative-weight draw over the catalog.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = FOOD_CATALOG.iter().map(|spec| spec.weight).sum();
        let draw = rng.gen_range(1..=total);
        let mut cumulative = 0;
        for spec in &FOOD_CATALOG {
            cumulative += spec.weight;
            if cumulative >= draw {
                return spec.kind;
            }
        }
        FoodKind::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
}

impl Food {
    /// Places a freshly sampled food on a cell no snake segment occupies.
    /// Returns `None` only when the whole grid is covered.
    pub fn spawn<'a, R, I>(rng: &mut R, snakes: I) -> Option<Self>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Snake> + Clone,
    {
        let cell = free_cell(rng, snakes)?;
        Some(Self {
            cell,
            kind: FoodKind::sample(rng),
        })
    }

    pub fn spec(&self) -> &'static FoodSpec {
        self.kind.spec()
    }

    pub fn snapshot(&self) -> FoodSnapshot {
        FoodSnapshot {
            x: self.cell.x,
            y: self.cell.y,
            kind: self.kind,
            color: self.spec().color,
        }
    }
}

fn free_cell<'a, R, I>(rng: &mut R, snakes: I) -> Option<Cell>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a Snake> + Clone,
{
    let occupied = |cell: Cell| snakes.clone().into_iter().any(|snake| snake.occupies(cell));

    for _ in 0..MAX_FOOD_SAMPLE_ATTEMPTS {
        let cell = Cell::new(rng.gen_range(0..GRID_WIDTH), rng.gen_range(0..GRID_HEIGHT));
        if !occupied(cell) {
            return Some(cell);
        }
    }

    (0..GRID_WIDTH)
        .flat_map(|x| (0..GRID_HEIGHT).map(move |y| Cell::new(x, y)))
        .filter(|cell| !occupied(*cell))
        .choose(rng)
}
