#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile director that walks a cursor over the formation and picks the
//! enemy that fires next.
//!
//! The director only fires while the shot clock selects its handler. Every
//! shot-clock tick attempts a shot at the cursor, advances the cursor along the
//! active pattern and keeps retrying until a live enemy fires or the pattern
//! runs off the grid, in which case the cursor is rerolled and the firing slot
//! is handed to another handler.

mod cursor;

pub use cursor::{Advance, Cursor, Heading};

use landers_core::{Command, Event, FormationView, GamePhase, HandlerId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Configuration parameters required to construct the director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identifier the shot clock uses to select this director.
    pub handler_id: HandlerId,
    /// Seed of the pattern, column, heading and dwell draws.
    pub rng_seed: u64,
    /// Smallest Rain dwell, inclusive.
    pub dwell_min: u32,
    /// Largest Rain dwell, exclusive.
    pub dwell_max: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            handler_id: HandlerId::new(0),
            rng_seed: 0x5eed_1a7d_e250_0001,
            dwell_min: 4,
            dwell_max: 12,
        }
    }
}

impl Config {
    /// Checks that every random range is non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dwell_min >= self.dwell_max {
            return Err(ConfigError::EmptyDwellRange {
                min: self.dwell_min,
                max: self.dwell_max,
            });
        }
        Ok(())
    }
}

/// Reasons a director configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The Rain dwell range contains no values.
    #[error("dwell range {min}..{max} is empty")]
    EmptyDwellRange {
        /// Configured minimum.
        min: u32,
        /// Configured exclusive maximum.
        max: u32,
    },
}

/// Pure system that turns shot-clock ticks into projectile spawns.
#[derive(Debug)]
pub struct ProjectileDirector {
    config: Config,
    cursor: Cursor,
    rng: ChaCha8Rng,
    last_selected: Option<HandlerId>,
}

impl ProjectileDirector {
    /// Creates a director after validating the supplied configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let cursor = Cursor::random(0, 0, config.dwell_min, config.dwell_max, &mut rng);
        Ok(Self {
            config,
            cursor,
            rng,
            last_selected: None,
        })
    }

    /// Identifier the shot clock selects this director by.
    #[must_use]
    pub fn handler_id(&self) -> HandlerId {
        self.config.handler_id
    }

    /// Current cursor state.
    #[must_use]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Consumes host events and emits projectile and shooter commands.
    ///
    /// `formation` must reflect the formation after it processed the same
    /// event batch.
    pub fn handle(&mut self, events: &[Event], formation: &FormationView, out: &mut Vec<Command>) {
        for event in events {
            match *event {
                Event::PhaseChanged {
                    phase: GamePhase::CountdownToStart,
                } => self.reroll(formation),
                Event::ShotClockTicked { selected } => {
                    if selected != self.config.handler_id {
                        self.last_selected = Some(selected);
                        continue;
                    }
                    if self.last_selected != Some(selected) {
                        self.reroll(formation);
                    }
                    self.fire(formation, out);
                }
                _ => {}
            }
        }
    }

    /// Leaves a fresh cursor that the next tick selecting this handler uses
    /// without rolling again.
    fn reroll(&mut self, formation: &FormationView) {
        let (columns, rows) = formation.dimensions();
        self.cursor = Cursor::random(
            columns,
            rows,
            self.config.dwell_min,
            self.config.dwell_max,
            &mut self.rng,
        );
        self.last_selected = Some(self.config.handler_id);
        debug!(
            handler = self.config.handler_id.get(),
            pattern = ?self.cursor.pattern,
            column = self.cursor.column,
            "firing cursor rerolled"
        );
    }

    fn fire(&mut self, formation: &FormationView, out: &mut Vec<Command>) {
        let (columns, rows) = formation.dimensions();
        if columns == 0 || rows == 0 {
            return;
        }

        loop {
            let fired = self.try_fire(formation, columns, rows, out);

            if self.cursor.advance(columns, rows, &mut self.rng) == Advance::Exhausted {
                self.reroll(formation);
                out.push(Command::SelectNewShooter);
                debug!(
                    handler = self.config.handler_id.get(),
                    "pattern exhausted, yielding shooter"
                );
                break;
            }

            if fired {
                break;
            }
        }
    }

    fn try_fire(
        &self,
        formation: &FormationView,
        columns: u32,
        rows: u32,
        out: &mut Vec<Command>,
    ) -> bool {
        let Some(position) = self
            .cursor
            .slot(columns, rows)
            .and_then(|slot| formation.live_position(slot))
        else {
            return false;
        };

        trace!(column = self.cursor.column, row = self.cursor.row, "projectile fired");
        out.push(Command::SpawnProjectile { position });
        true
    }
}
