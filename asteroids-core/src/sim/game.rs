use core::f64::consts::TAU;

use super::{
    BodySnapshot, LoadingProgress, ReplayCheckpoint, ReplayResult, TickViolation, WorldSnapshot,
};
use crate::asteroid::{spawn_wave, split, AsteroidPool};
use crate::constants::{
    BIG_POINTS, HYPER_COUNT, MAX_ROCKS, MAX_ROCK_SPEED, MAX_ROCK_SIDES, MAX_SHIPS, MAX_SHOTS,
    MISSILE_COUNT, MISSILE_MIN_LAUNCH_DISTANCE, MISSILE_POINTS, MISSILE_PROBABILITY,
    MIN_ROCK_SPEED, NEW_SHIP_POINTS, NEW_UFO_POINTS, ROCK_SPEED_STEP, SCRAP_COUNT, SMALL_POINTS,
    STORM_PAUSE, UFO_PASSES, UFO_POINTS,
};
use crate::debris::{explode, DebrisPool};
use crate::error::RuleCode;
use crate::events::{AudioCue, EventQueue, GameEvent};
use crate::geometry::{FieldSize, Point};
use crate::input::{Command, ControlState};
use crate::rng::{RandomSource, SeededRng};
use crate::saucer::Saucer;
use crate::ship::Ship;
use crate::sprite::{Body, Sprite};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SoundLoop {
    Saucer,
    Thruster,
    Missile,
}

impl SoundLoop {
    const ALL: [SoundLoop; 3] = [SoundLoop::Saucer, SoundLoop::Thruster, SoundLoop::Missile];

    fn start_cue(self) -> AudioCue {
        match self {
            Self::Saucer => AudioCue::SaucerLoopStart,
            Self::Thruster => AudioCue::ThrusterLoopStart,
            Self::Missile => AudioCue::MissileLoopStart,
        }
    }

    fn stop_cue(self) -> AudioCue {
        match self {
            Self::Saucer => AudioCue::SaucerLoopStop,
            Self::Thruster => AudioCue::ThrusterLoopStop,
            Self::Missile => AudioCue::MissileLoopStop,
        }
    }
}

/// The whole simulation: session state, every entity pool and the
/// random stream, advanced one tick at a time.
#[derive(Clone, Debug)]
pub struct Game<R: RandomSource = SeededRng> {
    field: FieldSize,
    rng: R,
    frame_count: u32,
    score: u32,
    high_score: u32,
    ships_left: i32,
    next_ship_score: u32,
    next_ufo_score: u32,
    asteroid_speed: f64,
    asteroids_left: i32,
    storm_counter: i32,
    playing: bool,
    paused: bool,
    muted: bool,
    detail: bool,
    loading: LoadingProgress,
    controls: ControlState,
    saucer_playing: bool,
    thrusters_playing: bool,
    missile_playing: bool,
    ship: Ship,
    saucer: Saucer,
    asteroids: AsteroidPool,
    debris: DebrisPool,
    stars: Vec<Point>,
    events: EventQueue,
}

impl Game<SeededRng> {
    pub fn new(field: FieldSize, seed: u32) -> Self {
        Self::with_rng(field, SeededRng::new(seed))
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }
}

impl<R: RandomSource> Game<R> {
    /// Builds the starfield and a finished session, leaving the game in
    /// attract mode until `StartSession`.
    pub fn with_rng(field: FieldSize, rng: R) -> Self {
        let mut game = Self {
            field,
            rng,
            frame_count: 0,
            score: 0,
            high_score: 0,
            ships_left: 0,
            next_ship_score: NEW_SHIP_POINTS,
            next_ufo_score: NEW_UFO_POINTS,
            asteroid_speed: MIN_ROCK_SPEED,
            asteroids_left: 0,
            storm_counter: 0,
            playing: false,
            paused: false,
            muted: false,
            detail: true,
            loading: LoadingProgress::default(),
            controls: ControlState::default(),
            saucer_playing: false,
            thrusters_playing: false,
            missile_playing: false,
            ship: Ship::new(),
            saucer: Saucer::default(),
            asteroids: AsteroidPool::new(),
            debris: DebrisPool::new(),
            stars: Vec::new(),
            events: EventQueue::default(),
        };

        game.stars = game.field.generate_stars(&mut game.rng);
        game.init_session();
        game.end_session();
        game
    }

    pub fn field(&self) -> FieldSize {
        self.field
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn ships_left(&self) -> i32 {
        self.ships_left
    }

    pub fn next_ship_score(&self) -> u32 {
        self.next_ship_score
    }

    pub fn next_ufo_score(&self) -> u32 {
        self.next_ufo_score
    }

    pub fn asteroid_speed(&self) -> f64 {
        self.asteroid_speed
    }

    pub fn asteroids_left(&self) -> i32 {
        self.asteroids_left
    }

    pub fn storm_counter(&self) -> i32 {
        self.storm_counter
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn detail(&self) -> bool {
        self.detail
    }

    pub fn loading(&self) -> LoadingProgress {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loading.is_complete()
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn saucer(&self) -> &Saucer {
        &self.saucer
    }

    pub fn asteroids(&self) -> &AsteroidPool {
        &self.asteroids
    }

    pub fn debris(&self) -> &DebrisPool {
        &self.debris
    }

    pub fn stars(&self) -> &[Point] {
        &self.stars
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Hands every queued cue to the host, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    /// Session start, end and mute stay disabled until `loaded >= total`.
    pub fn set_loading_progress(&mut self, loaded: u32, total: u32) {
        self.loading = LoadingProgress { loaded, total };
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Hold(control) => {
                self.controls.set(control, true);
                if self.controls.is_thrusting()
                    && self.ship.is_active()
                    && !self.thrusters_playing
                {
                    self.start_loop(SoundLoop::Thruster);
                }
            }
            Command::Release(control) => {
                self.controls.set(control, false);
                if !self.controls.is_thrusting() && self.thrusters_playing {
                    self.stop_loop(SoundLoop::Thruster);
                }
            }
            Command::Fire => {
                if self.ship.fire().is_some() {
                    self.cue(AudioCue::Fire);
                }
            }
            Command::Hyperspace => {
                if self.ship.hyperspace(&self.field, &mut self.rng) {
                    self.cue(AudioCue::Warp);
                }
            }
            Command::TogglePause => self.toggle_pause(),
            Command::ToggleMute => {
                if self.is_loaded() {
                    self.toggle_mute();
                }
            }
            Command::ToggleDetail => self.detail = !self.detail,
            Command::StartSession => {
                if self.is_loaded() && !self.playing {
                    self.init_session();
                }
            }
            Command::EndSession => {
                if self.is_loaded() {
                    self.end_session();
                }
            }
        }
    }

    /// Advances one tick. A paused game does not move and its frame
    /// counter stands still.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }

        self.frame_count = self.frame_count.wrapping_add(1);
        self.update_ship();
        self.ship.update_bullets(&self.field);
        self.update_saucer();
        self.update_missile();
        self.update_asteroids();
        self.update_debris();
        self.update_progression();
    }

    pub fn step_checked(&mut self) -> Result<(), TickViolation> {
        self.step();
        self.validate_invariants().map_err(|rule| TickViolation {
            frame_count: self.frame_count,
            rule,
        })
    }

    pub fn result(&self) -> ReplayResult {
        ReplayResult {
            frame_count: self.frame_count,
            final_score: self.score,
            high_score: self.high_score,
            ships_left: self.ships_left,
            playing: self.playing,
        }
    }

    pub fn checkpoint(&self) -> ReplayCheckpoint {
        let ship = self.ship.sprite();
        ReplayCheckpoint {
            frame_count: self.frame_count,
            score: self.score,
            ships_left: self.ships_left,
            asteroids_left: self.asteroids_left,
            asteroid_speed: self.asteroid_speed,
            bullets: self.ship.bullets().active_count(),
            debris: self.debris.active_count(),
            saucer_active: self.saucer.is_active(),
            missile_active: self.saucer.missile().is_active(),
            ship_active: ship.active,
            ship_x: ship.x,
            ship_y: ship.y,
            ship_angle: ship.angle,
            ship_hyper_counter: self.ship.hyper_counter(),
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let ship_active = self.ship.is_active();
        let flame = |held: bool, sprite: &Sprite| {
            (ship_active && self.detail && held).then(|| sprite.polygon().clone())
        };

        WorldSnapshot {
            frame_count: self.frame_count,
            field: self.field,
            score: self.score,
            high_score: self.high_score,
            ships_left: self.ships_left,
            playing: self.playing,
            paused: self.paused,
            muted: self.muted,
            detail: self.detail,
            loading: self.loading,
            asteroids_left: self.asteroids_left,
            asteroid_speed: self.asteroid_speed,
            ship: ship_active.then(|| body_snapshot(0, self.ship.sprite(), self.ship.intensity())),
            ship_hyper_counter: self.ship.hyper_counter(),
            forward_flame: flame(self.controls.thrust_forward, self.ship.forward_flame()),
            reverse_flame: flame(self.controls.thrust_reverse, self.ship.reverse_flame()),
            bullets: self
                .ship
                .bullets()
                .iter_active()
                .map(|(slot, bullet)| body_snapshot(slot, bullet.sprite(), u8::MAX))
                .collect(),
            asteroids: self
                .asteroids
                .iter_active()
                .map(|(slot, asteroid)| body_snapshot(slot, asteroid.sprite(), u8::MAX))
                .collect(),
            saucer: self
                .saucer
                .is_active()
                .then(|| body_snapshot(0, self.saucer.sprite(), u8::MAX)),
            missile: self.saucer.missile().is_active().then(|| {
                let missile = self.saucer.missile();
                body_snapshot(0, missile.sprite(), missile.intensity())
            }),
            debris: self
                .debris
                .iter_active()
                .map(|(slot, debris)| body_snapshot(slot, debris.sprite(), debris.intensity()))
                .collect(),
            stars: if self.detail {
                self.stars.clone()
            } else {
                Vec::new()
            },
        }
    }

    pub fn validate_invariants(&self) -> Result<(), RuleCode> {
        if self.ships_left < 0 {
            return Err(RuleCode::GlobalShipsLeftRange);
        }

        if self.high_score < self.score {
            return Err(RuleCode::GlobalHighScore);
        }

        if self.next_ship_score < NEW_SHIP_POINTS || self.next_ship_score % NEW_SHIP_POINTS != 0 {
            return Err(RuleCode::GlobalNextShipScore);
        }

        if self.next_ufo_score < NEW_UFO_POINTS || self.next_ufo_score % NEW_UFO_POINTS != 0 {
            return Err(RuleCode::GlobalNextUfoScore);
        }

        let ship = self.ship.sprite();
        if ship.active {
            if !self.field.contains(ship.x, ship.y) {
                return Err(RuleCode::ShipBounds);
            }
            if !(0.0..TAU).contains(&ship.angle) {
                return Err(RuleCode::ShipAngleRange);
            }
            check_outline(ship)?;
        }

        if !(0..=HYPER_COUNT).contains(&self.ship.hyper_counter()) {
            return Err(RuleCode::ShipHyperRange);
        }

        if !(0..=SCRAP_COUNT).contains(&self.ship.respawn_counter()) {
            return Err(RuleCode::ShipRespawnRange);
        }

        for (_, bullet) in self.ship.bullets().iter_active() {
            let sprite = bullet.sprite();
            if !self.field.contains(sprite.x, sprite.y) {
                return Err(RuleCode::BulletState);
            }
        }

        if self.asteroids_left != self.asteroids.active_count() as i32 {
            return Err(RuleCode::AsteroidCounter);
        }

        for (_, asteroid) in self.asteroids.iter_active() {
            let sprite = asteroid.sprite();
            if !self.field.contains(sprite.x, sprite.y) || !(0.0..TAU).contains(&sprite.angle) {
                return Err(RuleCode::AsteroidState);
            }
            if sprite.shape().len() >= MAX_ROCK_SIDES as usize {
                return Err(RuleCode::PolygonShape);
            }
            check_outline(sprite)?;
        }

        let storm_stalled = self.asteroids_left <= 0 && self.storm_counter <= 0;
        if self.storm_counter > STORM_PAUSE || storm_stalled {
            return Err(RuleCode::AsteroidWavePause);
        }

        let saucer = self.saucer.sprite();
        let saucer_valid = if saucer.active {
            (1..=UFO_PASSES).contains(&self.saucer.passes_left())
                && self.saucer.pass_counter() >= 0
                && self.field.contains(saucer.x, saucer.y)
        } else {
            self.saucer.passes_left() == 0 && self.saucer.pass_counter() == 0
        };
        if !saucer_valid {
            return Err(RuleCode::SaucerState);
        }
        if saucer.active {
            check_outline(saucer)?;
        }

        let missile = self.saucer.missile();
        let missile_valid = if missile.is_active() {
            (1..=MISSILE_COUNT).contains(&missile.counter())
                && self.field.contains(missile.sprite().x, missile.sprite().y)
        } else {
            missile.counter() == 0
        };
        if !missile_valid {
            return Err(RuleCode::MissileState);
        }
        if missile.is_active() {
            check_outline(missile.sprite())?;
        }

        for (_, debris) in self.debris.iter_active() {
            if !(0..=SCRAP_COUNT).contains(&debris.counter()) {
                return Err(RuleCode::DebrisState);
            }
            check_outline(debris.sprite())?;
        }

        Ok(())
    }

    fn cue(&mut self, cue: AudioCue) {
        if cue.is_stop() || (!self.muted && !self.paused) {
            self.events.push(self.frame_count, cue);
        }
    }

    fn loop_flag(&mut self, which: SoundLoop) -> &mut bool {
        match which {
            SoundLoop::Saucer => &mut self.saucer_playing,
            SoundLoop::Thruster => &mut self.thrusters_playing,
            SoundLoop::Missile => &mut self.missile_playing,
        }
    }

    /// (Re)starts a loop. The flag is set even while muted so unmuting can
    /// resume it.
    fn start_loop(&mut self, which: SoundLoop) {
        *self.loop_flag(which) = true;
        self.cue(which.start_cue());
    }

    fn stop_loop(&mut self, which: SoundLoop) {
        let flag = self.loop_flag(which);
        if *flag {
            *flag = false;
            self.cue(which.stop_cue());
        }
    }

    fn playing_loops(&self) -> Vec<SoundLoop> {
        SoundLoop::ALL
            .into_iter()
            .filter(|which| match which {
                SoundLoop::Saucer => self.saucer_playing,
                SoundLoop::Thruster => self.thrusters_playing,
                SoundLoop::Missile => self.missile_playing,
            })
            .collect()
    }

    fn toggle_pause(&mut self) {
        if self.paused {
            self.paused = false;
            for which in self.playing_loops() {
                self.cue(which.start_cue());
            }
        } else {
            for which in self.playing_loops() {
                self.cue(which.stop_cue());
            }
            self.paused = true;
        }
    }

    fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            for which in self.playing_loops() {
                self.cue(which.start_cue());
            }
        } else {
            self.muted = true;
            for which in self.playing_loops() {
                self.cue(which.stop_cue());
            }
        }
    }

    fn init_session(&mut self) {
        self.score = 0;
        self.ships_left = MAX_SHIPS;
        self.asteroid_speed = MIN_ROCK_SPEED;
        self.next_ship_score = NEW_SHIP_POINTS;
        self.next_ufo_score = NEW_UFO_POINTS;
        self.init_ship();
        self.stop_saucer();
        self.stop_missile();
        self.init_asteroids();
        self.playing = true;
        self.paused = false;
    }

    fn end_session(&mut self) {
        self.playing = false;
        self.stop_ship();
        self.stop_saucer();
        self.stop_missile();
    }

    fn init_ship(&mut self) {
        self.ship.reset(&self.field);
        self.stop_loop(SoundLoop::Thruster);
    }

    fn respawn_ship(&mut self) {
        self.ship.respawn(&self.field);
        self.stop_loop(SoundLoop::Thruster);
    }

    /// Wrecks the ship. Only a ship lost during play costs a life.
    fn stop_ship(&mut self) {
        self.ship.crash();
        if self.playing && self.ships_left > 0 {
            self.ships_left -= 1;
        }
        self.stop_loop(SoundLoop::Thruster);
    }

    fn enter_saucer(&mut self) {
        self.saucer.enter(&self.field, &mut self.rng);
        self.start_loop(SoundLoop::Saucer);
    }

    fn stop_saucer(&mut self) {
        self.saucer.stop();
        self.stop_loop(SoundLoop::Saucer);
    }

    fn launch_missile(&mut self) {
        let (x, y) = (self.saucer.sprite().x, self.saucer.sprite().y);
        self.saucer.missile_mut().launch(x, y, &self.field);
        self.start_loop(SoundLoop::Missile);
    }

    fn stop_missile(&mut self) {
        self.saucer.missile_mut().stop();
        self.stop_loop(SoundLoop::Missile);
    }

    /// Refills the field, arms the next wave's pause and raises the drift
    /// speed for the wave after.
    fn init_asteroids(&mut self) {
        spawn_wave(&mut self.asteroids, self.asteroid_speed, &self.field, &mut self.rng);
        self.storm_counter = STORM_PAUSE;
        self.asteroids_left = MAX_ROCKS as i32;
        if self.asteroid_speed < MAX_ROCK_SPEED {
            self.asteroid_speed = (self.asteroid_speed + ROCK_SPEED_STEP).min(MAX_ROCK_SPEED);
        }
    }

    fn explode_sprite(&mut self, source: ExplosionSource) {
        let sprite = match source {
            ExplosionSource::Ship => self.ship.sprite_mut(),
            ExplosionSource::Saucer => self.saucer.sprite_mut(),
            ExplosionSource::Missile => self.saucer.missile_mut().sprite_mut(),
            ExplosionSource::Asteroid(index) => match self.asteroids.get_mut(index) {
                Some(asteroid) => asteroid.sprite_mut(),
                None => return,
            },
        };
        explode(sprite, &mut self.debris, self.detail, &self.field, &mut self.rng);
    }

    /// Destroys the ship along with any saucer and missile in flight.
    fn destroy_ship(&mut self) {
        self.cue(AudioCue::ExplosionLarge);
        self.explode_sprite(ExplosionSource::Ship);
        self.stop_ship();
        self.stop_saucer();
        self.stop_missile();
    }

    fn bullet_hits(&self, target: &dyn Body) -> Option<usize> {
        self.ship
            .bullets()
            .iter_active()
            .find(|(_, bullet)| target.collides_with(*bullet))
            .map(|(index, _)| index)
    }

    fn update_ship(&mut self) {
        if !self.playing {
            return;
        }

        self.ship.steer(&self.controls);
        if self.ship.is_active() {
            self.ship.update(&self.field);
        } else if self.ship.tick_respawn() {
            if self.ships_left > 0 {
                self.respawn_ship();
            } else {
                self.end_session();
            }
        }
    }

    fn update_saucer(&mut self) {
        if !self.saucer.is_active() {
            return;
        }

        if self.saucer.tick_pass() {
            if self.saucer.spend_pass() {
                self.enter_saucer();
            } else {
                self.stop_saucer();
            }
        }
        if !self.saucer.is_active() {
            return;
        }

        let field = self.field;
        let sprite = self.saucer.sprite_mut();
        sprite.advance(&field);
        sprite.render(&field);

        if self.bullet_hits(&self.saucer).is_some() {
            self.cue(AudioCue::ExplosionLarge);
            self.explode_sprite(ExplosionSource::Saucer);
            self.stop_saucer();
            self.score += UFO_POINTS;
            return;
        }

        if self.ship.is_vulnerable() && self.saucer.collides_with(&self.ship) {
            self.cue(AudioCue::ExplosionLarge);
            self.explode_sprite(ExplosionSource::Saucer);
            self.destroy_ship();
            return;
        }

        let ship = self.ship.sprite();
        let saucer = self.saucer.sprite();
        let distance = (saucer.x - ship.x).abs().max((saucer.y - ship.y).abs()) as i32;
        if self.ship.is_vulnerable()
            && !self.saucer.missile().is_active()
            && f64::from(distance) > MISSILE_MIN_LAUNCH_DISTANCE
            && self.rng.next_f64() < MISSILE_PROBABILITY
        {
            self.launch_missile();
        }
    }

    fn update_missile(&mut self) {
        if !self.saucer.missile().is_active() {
            return;
        }

        if self.saucer.missile_mut().tick_lifetime() {
            self.stop_missile();
            return;
        }

        let field = self.field;
        let vulnerable = self.ship.is_vulnerable();
        let (target_x, target_y) = (self.ship.sprite().x, self.ship.sprite().y);
        let missile = self.saucer.missile_mut();
        if vulnerable {
            missile.steer_toward(target_x, target_y);
        }
        let sprite = missile.sprite_mut();
        sprite.advance(&field);
        sprite.render(&field);

        if self.bullet_hits(self.saucer.missile()).is_some() {
            self.cue(AudioCue::ExplosionLarge);
            self.explode_sprite(ExplosionSource::Missile);
            self.stop_missile();
            self.score += MISSILE_POINTS;
            return;
        }

        if self.ship.is_vulnerable() && self.saucer.missile().collides_with(&self.ship) {
            self.destroy_ship();
        }
    }

    fn update_asteroids(&mut self) {
        let field = self.field;
        for index in 0..MAX_ROCKS {
            let Some(asteroid) = self.asteroids.get_mut(index) else {
                continue;
            };
            if !asteroid.is_active() {
                continue;
            }
            let sprite = asteroid.sprite_mut();
            sprite.advance(&field);
            sprite.render(&field);

            for shot in 0..MAX_SHOTS {
                if self.asteroid_struck(index, shot) {
                    self.break_asteroid(index, shot);
                }
            }

            let rammed = self.ship.is_vulnerable()
                && self
                    .asteroids
                    .get(index)
                    .is_some_and(|asteroid| asteroid.is_active() && asteroid.collides_with(&self.ship));
            if rammed {
                self.destroy_ship();
            }
        }
    }

    fn asteroid_struck(&self, index: usize, shot: usize) -> bool {
        match (self.asteroids.get(index), self.ship.bullets().get(shot)) {
            (Some(asteroid), Some(bullet)) => {
                asteroid.is_active() && bullet.is_active() && asteroid.collides_with(bullet)
            }
            _ => false,
        }
    }

    /// Scores a bullet strike. A large body splits into the first free
    /// slots, which may include its own.
    fn break_asteroid(&mut self, index: usize, shot: usize) {
        self.asteroids_left -= 1;
        if let Some(bullet) = self.ship.bullets_mut().get_mut(shot) {
            bullet.deactivate();
        }
        let Some(asteroid) = self.asteroids.get_mut(index) else {
            return;
        };
        asteroid.deactivate();
        let small = asteroid.is_small();
        let (x, y) = (asteroid.sprite().x, asteroid.sprite().y);

        self.cue(AudioCue::ExplosionSmall);
        self.explode_sprite(ExplosionSource::Asteroid(index));

        if small {
            self.score += SMALL_POINTS;
        } else {
            self.score += BIG_POINTS;
            let created = split(
                &mut self.asteroids,
                x,
                y,
                self.asteroid_speed,
                &self.field,
                &mut self.rng,
            );
            self.asteroids_left += created as i32;
        }
    }

    fn update_debris(&mut self) {
        let field = self.field;
        self.debris.for_each_active(|_, debris| debris.update(&field));
    }

    /// High score, extra ships, saucer arrivals and wave refills.
    fn update_progression(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }

        if self.score > self.next_ship_score {
            self.next_ship_score += NEW_SHIP_POINTS;
            self.ships_left += 1;
        }

        if self.playing && self.score > self.next_ufo_score && !self.saucer.is_active() {
            self.next_ufo_score += NEW_UFO_POINTS;
            self.saucer.reset_passes();
            self.enter_saucer();
        }

        if self.asteroids_left <= 0 {
            self.storm_counter -= 1;
            if self.storm_counter <= 0 {
                self.init_asteroids();
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum ExplosionSource {
    Ship,
    Saucer,
    Missile,
    Asteroid(usize),
}

fn body_snapshot(slot: usize, sprite: &Sprite, intensity: u8) -> BodySnapshot {
    BodySnapshot {
        slot,
        x: sprite.x,
        y: sprite.y,
        dx: sprite.dx,
        dy: sprite.dy,
        angle: sprite.angle,
        polygon: sprite.polygon().clone(),
        intensity,
    }
}

fn check_outline(sprite: &Sprite) -> Result<(), RuleCode> {
    if sprite.polygon().len() != sprite.shape().len() {
        return Err(RuleCode::PolygonShape);
    }
    Ok(())
}
