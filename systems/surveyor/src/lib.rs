#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reaction of the bonus surveyor to being hit by the ball.

use landers_core::{Command, EnemyKind, Event, GamePhase};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration parameters required to construct the surveyor system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Points awarded for destroying the surveyor.
    pub points: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { points: 1_000 }
    }
}

/// Pure system that scores the surveyor and drops its pickup.
#[derive(Debug)]
pub struct Surveyor {
    config: Config,
    active: bool,
}

impl Surveyor {
    /// Creates an active surveyor.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            active: true,
        }
    }

    /// Whether the surveyor can still be hit.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consumes host events and emits drop, scoring and removal commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match *event {
                Event::PhaseChanged {
                    phase: GamePhase::CountdownToStart,
                } => self.active = true,
                Event::SurveyorHit { position } => {
                    if !self.active {
                        debug!("ignoring hit on inactive surveyor");
                        continue;
                    }
                    self.active = false;
                    info!(points = self.config.points, "surveyor destroyed");
                    out.extend([
                        Command::SpawnDrop { position },
                        Command::RecordKill {
                            kind: EnemyKind::Surveyor,
                        },
                        Command::AddScore {
                            points: self.config.points,
                        },
                        Command::DestroySurveyor,
                    ]);
                }
                _ => {}
            }
        }
    }
}
