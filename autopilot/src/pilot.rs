//! Scripted pilots that fly the simulation through `Command`s.

use asteroids_core::input::ControlState;
use asteroids_core::sim::{BodySnapshot, WorldSnapshot};
use asteroids_core::{Command, Control};
use std::f64::consts::{PI, TAU};

pub trait Pilot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    /// Commands to apply before the next tick.
    fn next_commands(&mut self, world: &WorldSnapshot) -> Vec<Command>;
}

/// Tracks which controls the pilot holds and turns a wanted state into
/// `Hold`/`Release` transitions.
#[derive(Clone, Copy, Debug, Default)]
struct HeldControls {
    held: ControlState,
}

impl HeldControls {
    const ALL: [Control; 4] = [
        Control::RotateLeft,
        Control::RotateRight,
        Control::ThrustForward,
        Control::ThrustReverse,
    ];

    fn steer_to(&mut self, wanted: ControlState, out: &mut Vec<Command>) {
        for control in Self::ALL {
            let want = wanted.is_held(control);
            if want != self.held.is_held(control) {
                self.held.set(control, want);
                out.push(if want {
                    Command::Hold(control)
                } else {
                    Command::Release(control)
                });
            }
        }
    }
}

/// Starts once, then drifts without input.
#[derive(Debug, Default)]
pub struct IdlePilot {
    started: bool,
}

impl Pilot for IdlePilot {
    fn id(&self) -> &'static str {
        "idle"
    }

    fn description(&self) -> &'static str {
        "Starts a session and never touches the controls."
    }

    fn reset(&mut self, _seed: u32) {
        self.started = false;
    }

    fn next_commands(&mut self, world: &WorldSnapshot) -> Vec<Command> {
        start_once(&mut self.started, world).into_iter().collect()
    }
}

/// Turns in place and fires on a fixed cadence.
#[derive(Debug)]
pub struct SpinnerPilot {
    started: bool,
    controls: HeldControls,
    cooldown: u32,
    fire_interval: u32,
}

impl Default for SpinnerPilot {
    fn default() -> Self {
        Self {
            started: false,
            controls: HeldControls::default(),
            cooldown: 0,
            fire_interval: 6,
        }
    }
}

impl Pilot for SpinnerPilot {
    fn id(&self) -> &'static str {
        "spinner"
    }

    fn description(&self) -> &'static str {
        "Rotates left continuously and fires every few ticks."
    }

    fn reset(&mut self, seed: u32) {
        *self = Self::default();
        // Stagger the first volley so seeds do not all fire in lockstep.
        self.cooldown = seed % self.fire_interval;
    }

    fn next_commands(&mut self, world: &WorldSnapshot) -> Vec<Command> {
        let mut out: Vec<Command> = start_once(&mut self.started, world).into_iter().collect();
        if world.ship.is_none() {
            return out;
        }

        let wanted = ControlState {
            rotate_left: true,
            ..ControlState::default()
        };
        self.controls.steer_to(wanted, &mut out);

        if self.cooldown == 0 {
            out.push(Command::Fire);
            self.cooldown = self.fire_interval;
        } else {
            self.cooldown -= 1;
        }
        out
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HunterConfig {
    /// Radians of misalignment still worth a shot.
    pub fire_tolerance: f64,
    /// Radians of misalignment the pilot ignores when turning.
    pub turn_deadband: f64,
    pub fire_interval: u32,
    /// Threats nearer than this trigger a hyperspace jump.
    pub panic_radius: f64,
    /// Targets beyond this range are not worth firing at.
    pub fire_range: f64,
    /// Thrust toward targets farther away than this.
    pub chase_range: f64,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            fire_tolerance: 0.12,
            turn_deadband: 0.04,
            fire_interval: 4,
            panic_radius: 42.0,
            fire_range: 420.0,
            chase_range: 520.0,
        }
    }
}

/// Turns toward the nearest threat on the wrapped field, fires when lined
/// up and jumps to hyperspace when something gets too close.
#[derive(Debug, Default)]
pub struct HunterPilot {
    config: HunterConfig,
    started: bool,
    controls: HeldControls,
    cooldown: u32,
}

impl HunterPilot {
    pub fn with_config(config: HunterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl Pilot for HunterPilot {
    fn id(&self) -> &'static str {
        "hunter"
    }

    fn description(&self) -> &'static str {
        "Aims at the nearest threat, fires when aligned, warps out of collisions."
    }

    fn reset(&mut self, _seed: u32) {
        *self = Self::with_config(self.config);
    }

    fn next_commands(&mut self, world: &WorldSnapshot) -> Vec<Command> {
        let mut out: Vec<Command> = start_once(&mut self.started, world).into_iter().collect();
        let Some(ship) = world.ship.as_ref() else {
            self.controls.steer_to(ControlState::default(), &mut out);
            return out;
        };

        let width = f64::from(world.field.width());
        let height = f64::from(world.field.height());
        let nearest = threats(world)
            .map(|body| {
                let dx = wrap_delta(body.x - ship.x, width);
                let dy = wrap_delta(body.y - ship.y, height);
                (dx, dy, dx.hypot(dy))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));

        let Some((dx, dy, distance)) = nearest else {
            self.controls.steer_to(ControlState::default(), &mut out);
            return out;
        };

        if distance < self.config.panic_radius && world.ship_hyper_counter == 0 {
            self.controls.steer_to(ControlState::default(), &mut out);
            out.push(Command::Hyperspace);
            return out;
        }

        let delta = signed_angle_delta(ship.angle, aim_angle(dx, dy));
        let wanted = ControlState {
            rotate_left: delta > self.config.turn_deadband,
            rotate_right: delta < -self.config.turn_deadband,
            thrust_forward: distance > self.config.chase_range
                && delta.abs() < self.config.fire_tolerance,
            thrust_reverse: false,
        };
        self.controls.steer_to(wanted, &mut out);

        if self.cooldown > 0 {
            self.cooldown -= 1;
        } else if delta.abs() < self.config.fire_tolerance && distance < self.config.fire_range {
            out.push(Command::Fire);
            self.cooldown = self.config.fire_interval;
        }
        out
    }
}

fn start_once(started: &mut bool, world: &WorldSnapshot) -> Option<Command> {
    if *started || world.playing {
        *started = true;
        return None;
    }
    *started = true;
    Some(Command::StartSession)
}

fn threats(world: &WorldSnapshot) -> impl Iterator<Item = &BodySnapshot> {
    world
        .asteroids
        .iter()
        .chain(world.saucer.iter())
        .chain(world.missile.iter())
}

/// Shortest signed offset across a wrapping axis of length `span`.
pub fn wrap_delta(delta: f64, span: f64) -> f64 {
    let half = span / 2.0;
    let wrapped = (delta + half).rem_euclid(span) - half;
    if wrapped <= -half {
        wrapped + span
    } else {
        wrapped
    }
}

/// Ship heading whose bullets travel along `(dx, dy)` in field
/// coordinates, where y grows down the screen.
pub fn aim_angle(dx: f64, dy: f64) -> f64 {
    (-dx).atan2(-dy).rem_euclid(TAU)
}

/// `target - current`, folded into `(-π, π]`. Positive means turn left.
pub fn signed_angle_delta(current: f64, target: f64) -> f64 {
    let delta = (target - current).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

pub fn pilot_ids() -> &'static [&'static str] {
    &["idle", "spinner", "hunter"]
}

pub fn create_pilot(id: &str) -> Option<Box<dyn Pilot + Send>> {
    match id {
        "idle" => Some(Box::new(IdlePilot::default())),
        "spinner" => Some(Box::new(SpinnerPilot::default())),
        "hunter" => Some(Box::new(HunterPilot::default())),
        _ => None,
    }
}

pub fn describe_pilots() -> Vec<(&'static str, &'static str)> {
    pilot_ids()
        .iter()
        .filter_map(|id| create_pilot(id))
        .map(|pilot| (pilot.id(), pilot.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::{FieldSize, Game};

    #[test]
    fn aim_angle_matches_bullet_heading() {
        // Angle zero fires up the screen.
        assert!(aim_angle(0.0, -10.0).abs() < 1e-12);
        // A quarter turn left fires toward negative x.
        assert!((aim_angle(-10.0, 0.0) - PI / 2.0).abs() < 1e-12);
        assert!((aim_angle(10.0, 0.0) - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_delta_takes_the_short_way() {
        assert_eq!(wrap_delta(500.0, 1200.0), 500.0);
        assert_eq!(wrap_delta(700.0, 1200.0), -500.0);
        assert_eq!(wrap_delta(-700.0, 1200.0), 500.0);
        assert_eq!(wrap_delta(600.0, 1200.0), 600.0);
    }

    #[test]
    fn signed_delta_prefers_the_smaller_turn() {
        assert!((signed_angle_delta(0.1, 6.2) - (6.2 - 0.1 - TAU)).abs() < 1e-12);
        assert!((signed_angle_delta(6.2, 0.1) - (0.1 + TAU - 6.2)).abs() < 1e-12);
    }

    #[test]
    fn held_controls_emit_transitions_only() {
        let mut held = HeldControls::default();
        let mut out = Vec::new();
        let left = ControlState {
            rotate_left: true,
            ..ControlState::default()
        };
        held.steer_to(left, &mut out);
        held.steer_to(left, &mut out);
        assert_eq!(out, vec![Command::Hold(Control::RotateLeft)]);

        out.clear();
        held.steer_to(ControlState::default(), &mut out);
        assert_eq!(out, vec![Command::Release(Control::RotateLeft)]);
    }

    #[test]
    fn pilots_start_a_session_first() {
        let game = Game::new(FieldSize::default(), 1);
        for id in pilot_ids() {
            let mut pilot = create_pilot(id).expect("known pilot");
            pilot.reset(1);
            let commands = pilot.next_commands(&game.snapshot());
            assert_eq!(commands.first(), Some(&Command::StartSession), "{id}");
        }

        let mut idle = IdlePilot::default();
        idle.next_commands(&game.snapshot());
        assert!(idle.next_commands(&game.snapshot()).is_empty());
    }

    #[test]
    fn unknown_pilot_is_none() {
        assert!(create_pilot("nobody").is_none());
        assert_eq!(describe_pilots().len(), pilot_ids().len());
    }
}
