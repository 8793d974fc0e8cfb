#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Formation controller that spawns, sweeps, descends and bounces a grid of
//! landers.
//!
//! Each column of the grid hangs from its own pivot, so the sweep is a
//! rotation of every column around the shared origin rather than a linear
//! translation. Within one frame the motions resolve in a fixed order: the
//! entry motion first, then a bounce, then a descend, then the sweep. A bounce
//! in progress consumes the whole frame, as does a descend that has not yet
//! covered its full distance.

mod config;
mod curve;
mod grid;

pub use config::{Config, ConfigError, SweepDirection};
pub use curve::{Curve, Keyframe};

use landers_core::{Command, Event, FormationView, GamePhase, SlotCoord};
use tracing::{debug, error, info, warn};

use crate::grid::Grid;

/// Mutable motion state of a formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationState {
    /// Current sweep direction.
    pub direction: SweepDirection,
    /// Set when an edge was reached and a descend step is pending.
    pub descending: bool,
    /// Set while a bounce recoil is pending.
    pub bouncing: bool,
    /// Radial distance already covered by the current descend step.
    pub drop_offset: f32,
    /// Radial distance already covered by the current bounce.
    pub bounce_offset: f32,
    /// Multiplier applied to descend and sweep speed; grows every round.
    pub speed_multiplier: f32,
    /// Radial distance left to travel before the formation is in frame.
    pub entry_offset: f32,
    /// Enemies killed since the formation was last populated.
    pub kill_count: u32,
}

/// Pure system that owns the lander grid and drives its collective motion.
#[derive(Debug)]
pub struct FormationController {
    config: Config,
    grid: Grid,
    state: FormationState,
    phase: GamePhase,
    countdown_pending: bool,
}

impl FormationController {
    /// Creates a controller after validating the supplied configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(&config),
            state: FormationState {
                direction: config.starting_direction,
                descending: false,
                bouncing: false,
                drop_offset: 0.0,
                bounce_offset: 0.0,
                speed_multiplier: 1.0,
                entry_offset: 0.0,
                kill_count: 0,
            },
            phase: GamePhase::default(),
            countdown_pending: false,
            config,
        })
    }

    /// Consumes host events in order and emits the resulting commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match *event {
                Event::PhaseChanged { phase } => {
                    self.phase = phase;
                    if phase == GamePhase::CountdownToStart {
                        self.start_round(out);
                    }
                }
                Event::FrameAdvanced { dt } => self.advance(dt, out),
                Event::EnemyKilled { slot } => self.enemy_killed(slot, out),
                Event::EnemyBounced { slot } => self.enemy_bounced(slot),
                Event::EnemyWiringFailed { slot } => self.enemy_unwired(slot),
                Event::ShotClockTicked { .. } | Event::SurveyorHit { .. } => {}
            }
        }
    }

    /// Captures a read-only view of every slot for targeting and rendering.
    #[must_use]
    pub fn view(&self) -> FormationView {
        self.grid.view()
    }

    /// Current motion state.
    #[must_use]
    pub fn state(&self) -> &FormationState {
        &self.state
    }

    /// Configuration the controller was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accumulated rotation of every column pivot, in degrees.
    #[must_use]
    pub fn column_angles(&self) -> &[f32] {
        self.grid.column_angles()
    }

    /// Formation-wide radial displacement applied on top of each row's height.
    #[must_use]
    pub fn radial_offset(&self) -> f32 {
        self.grid.radial_offset()
    }

    /// Phase last reported by the host.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    fn start_round(&mut self, out: &mut Vec<Command>) {
        self.state.speed_multiplier += self.config.speed_increment;
        if self.grid.is_populated() {
            self.grid.clear(out);
        }
        self.populate(out);
        self.countdown_pending = true;
        info!(
            speed_multiplier = self.state.speed_multiplier,
            capacity = self.config.capacity(),
            "round started"
        );
    }

    fn populate(&mut self, out: &mut Vec<Command>) {
        self.state.kill_count = 0;
        self.state.entry_offset = self.config.entry_amount;
        self.grid.populate(&self.config, out);
    }

    fn kill_fraction(&self) -> f32 {
        self.state.kill_count as f32 / self.config.capacity() as f32
    }

    fn advance(&mut self, dt: f32, out: &mut Vec<Command>) {
        if !self.phase.is_active() {
            return;
        }
        if !(dt.is_finite() && dt >= 0.0) {
            warn!(dt, "ignoring invalid frame delta");
            return;
        }

        if self.state.entry_offset > 0.0 {
            let step = self.config.entry_speed * dt;
            self.state.entry_offset -= step;
            self.grid.translate(-step);

            if self.state.entry_offset <= 0.0 {
                self.grid.translate(-self.state.entry_offset);
                self.state.entry_offset = 0.0;
            }
        }

        if self.phase == GamePhase::CountdownToStart {
            // A zero entry distance starts the round already in frame.
            if self.countdown_pending && self.state.entry_offset <= 0.0 {
                self.countdown_pending = false;
                debug!("formation in frame, ending countdown");
                out.push(Command::EndCountdown);
            }
            return;
        }

        if self.state.bouncing {
            self.advance_bounce(dt);
            return;
        }

        if self.state.descending && !self.advance_descend(dt) {
            return;
        }

        self.sweep(dt);
    }

    fn advance_bounce(&mut self, dt: f32) {
        let amount = self.config.bounce_amount;
        let step = self
            .config
            .bounce_speed
            .evaluate(self.state.bounce_offset / amount)
            * dt;
        self.state.bounce_offset += step;
        self.grid.translate(step);

        if self.state.bounce_offset >= amount {
            self.grid.translate(amount - self.state.bounce_offset);
            self.state.bouncing = false;
            self.state.bounce_offset = 0.0;
        }
    }

    /// Returns `true` once the descend step is complete.
    fn advance_descend(&mut self, dt: f32) -> bool {
        let amount = self.config.drop_amount;
        let step = self.config.move_speed.evaluate(self.kill_fraction())
            * self.state.speed_multiplier
            * dt;
        self.state.drop_offset += step;
        self.grid.translate(-step);

        if self.state.drop_offset < amount {
            return false;
        }

        self.grid.translate(self.state.drop_offset - amount);
        self.state.descending = false;
        self.state.drop_offset = 0.0;
        true
    }

    fn sweep(&mut self, dt: f32) {
        let direction = self.state.direction;
        let (low, high) = (self.config.low_angle_bound, self.config.high_angle_bound);
        let at_edge = self.grid.live_column_angles().any(|angle| match direction {
            SweepDirection::Negative => angle < low,
            SweepDirection::Positive => angle > high,
        });

        if at_edge {
            self.state.direction = direction.reversed();
            self.state.descending = true;
            debug!(direction = ?self.state.direction, "formation reached edge");
            return;
        }

        let degrees = self.config.move_speed.evaluate(self.kill_fraction())
            * self.state.speed_multiplier
            * self.config.rotation_speed
            * dt
            * direction.sign();
        self.grid.rotate_columns(degrees);
    }

    fn enemy_killed(&mut self, slot: SlotCoord, out: &mut Vec<Command>) {
        let Some(enemy) = self.grid.enemy_mut(slot) else {
            warn!(?slot, "kill reported for empty slot");
            return;
        };
        if !enemy.wired {
            debug!(?slot, "ignoring kill from unwired enemy");
            return;
        }
        if !enemy.alive {
            debug!(?slot, "ignoring repeated kill");
            return;
        }

        enemy.alive = false;
        out.push(Command::RecordKill { kind: enemy.kind });
        self.state.kill_count += 1;

        if self.state.kill_count >= self.config.capacity() {
            info!(bonus = self.config.wave_clear_bonus, "wave cleared");
            out.push(Command::AddScore {
                points: self.config.wave_clear_bonus,
            });
            self.grid.clear(out);
            self.populate(out);
        }
    }

    fn enemy_bounced(&mut self, slot: SlotCoord) {
        match self.grid.enemy_mut(slot) {
            Some(enemy) if enemy.wired && enemy.alive => self.state.bouncing = true,
            _ => debug!(?slot, "ignoring bounce from inactive slot"),
        }
    }

    fn enemy_unwired(&mut self, slot: SlotCoord) {
        match self.grid.enemy_mut(slot) {
            Some(enemy) => {
                enemy.wired = false;
                error!(?slot, kind = ?enemy.kind, "enemy actor is missing its behaviour component");
            }
            None => warn!(?slot, "wiring failure reported for empty slot"),
        }
    }
}
