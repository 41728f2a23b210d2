//! Tuning constants for the simulation.
//!
//! Every rate is expressed per tick and derived from the fixed frame delay,
//! so changing `FRAME_DELAY_MS` rescales speeds and timers together.

use core::f64::consts::PI;

// Timing
pub const FRAME_DELAY_MS: u64 = 20;
pub const FPS: i32 = (1000 / FRAME_DELAY_MS) as i32; // 50 ticks per second
const FPS_F64: f64 = FPS as f64;

// Field
pub const DEFAULT_FIELD_WIDTH: i32 = 1200;
pub const DEFAULT_FIELD_HEIGHT: i32 = 800;
pub const STAR_AREA_PER_STAR: i32 = 5000;

// Pool capacities
pub const MAX_SHOTS: usize = 8;
pub const MAX_ROCKS: usize = 8;
pub const MAX_SCRAP: usize = 40;

// Countdown starting values, in ticks
pub const SCRAP_COUNT: i32 = 2 * FPS; // debris lifetime and ship respawn delay
pub const HYPER_COUNT: i32 = 3 * FPS; // hyperspace invulnerability window
pub const MISSILE_COUNT: i32 = 4 * FPS; // homing missile lifetime
pub const STORM_PAUSE: i32 = 2 * FPS; // gap between asteroid waves

// Asteroid shape, speed and spin ranges
pub const MIN_ROCK_SIDES: i32 = 6;
pub const MAX_ROCK_SIDES: i32 = 16; // exclusive
pub const MIN_ROCK_SIZE: i32 = 20;
pub const MAX_ROCK_SIZE: i32 = 40; // exclusive
pub const MIN_ROCK_SPEED: f64 = 40.0 / FPS_F64;
pub const MAX_ROCK_SPEED: f64 = 240.0 / FPS_F64;
pub const MAX_ROCK_SPIN: f64 = PI / FPS_F64;
pub const ROCK_SPEED_STEP: f64 = 0.5; // per wave

// Ship
pub const MAX_SHIPS: i32 = 3;
pub const SHIP_ANGLE_STEP: f64 = PI / FPS_F64;
pub const SHIP_SPEED_STEP: f64 = 15.0 / FPS_F64;
pub const MAX_SHIP_SPEED: f64 = 1.25 * MAX_ROCK_SPEED;
pub const BULLET_SPEED: f64 = 2.0 * MAX_ROCK_SPEED;

// Saucer and missile
pub const UFO_PASSES: i32 = 3;
pub const MISSILE_PROBABILITY: f64 = 0.45 / FPS_F64;
pub const MISSILE_SPEED: f64 = 0.75 * MAX_ROCK_SPEED;
pub const MISSILE_MIN_LAUNCH_DISTANCE: f64 = MAX_ROCK_SPEED * FPS_F64 / 2.0;
pub const DEBRIS_SPIN_FACTOR: f64 = 4.0;

// Scoring
pub const BIG_POINTS: u32 = 25;
pub const SMALL_POINTS: u32 = 50;
pub const UFO_POINTS: u32 = 250;
pub const MISSILE_POINTS: u32 = 500;
pub const NEW_SHIP_POINTS: u32 = 5000;
pub const NEW_UFO_POINTS: u32 = 2750;

// Presentation
pub const MAX_INTENSITY: i32 = 255;
pub const MISSILE_FADE_STEP: i32 = 24;
pub const DETAIL_STRIDE_MIN_VERTICES: usize = 6;
