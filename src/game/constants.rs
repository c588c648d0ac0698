pub const CANVAS_WIDTH: i32 = 800;
pub const CANVAS_HEIGHT: i32 = 600;
pub const CELL_SIZE: i32 = 20;
pub const GRID_WIDTH: i32 = CANVAS_WIDTH / CELL_SIZE;
pub const GRID_HEIGHT: i32 = CANVAS_HEIGHT / CELL_SIZE;

pub const MAX_PARTICIPANTS: usize = 4;
pub const DEATH_FOOD_MIN_OCCUPANCY: usize = 3;

pub const TICK_MS: u64 = 200;
pub const SCAN_MS: u64 = 50;
pub const FAULT_BACKOFF_MS: u64 = 1000;

pub const COUNTDOWN_FROM: u32 = 3;
pub const COUNTDOWN_STEP_MS: u64 = 1000;
pub const GO_DELAY_MS: u64 = 500;

pub const SPEED_BOOST_TICKS: u32 = 50;
pub const INVINCIBLE_TICKS: u32 = 25;

pub const MAX_FOOD_SAMPLE_ATTEMPTS: usize = 64;

pub const MEAN_COMMENT_MIN_SECS: f64 = 3.0;
pub const MEAN_COMMENT_MAX_SECS: f64 = 8.0;
pub const MEAN_COMMENT_BACKOFF_SECS: u64 = 5;

pub const START_CELLS: [(i32, i32); MAX_PARTICIPANTS] = [(5, 5), (35, 5), (5, 25), (35, 25)];

pub const COLOR_POOL: [&str; MAX_PARTICIPANTS] = ["#ff4444", "#44ff44", "#4444ff", "#ffff44"];

pub const MEAN_COMMENTS: [&str; 16] = [
    "Walls: 1, you: 0.",
    "That snake had a promising career. Had.",
    "Bold strategy. Did not work.",
    "Your snake is now a very short noodle.",
    "Have you considered a slower hobby?",
    "The arrow keys are the pointy ones.",
    "Spectator mode unlocked the hard way.",
    "Somewhere a garden snake is laughing.",
    "Tactical retreat into a wall, very brave.",
    "You zigged when you should have zagged.",
    "Respawn denied. Reflect on your choices.",
    "Even the food is disappointed.",
    "That turn was a suggestion, not a plan.",
    "Certified snake-skill issue.",
    "Try steering next round.",
    "Graceful. Right up until the crash.",
];
