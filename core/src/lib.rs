#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lander wave systems.
//!
//! This crate defines the message surface that connects the host engine to
//! the pure wave systems. The host broadcasts [`Event`] values describing what
//! happened (frame advanced, game phase changed, an enemy was killed), systems
//! consume those event batches together with immutable views such as
//! [`FormationView`], and respond exclusively with [`Command`] values that the
//! host executes (spawn a projectile, add score, end the countdown).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Points awarded when an entire formation is cleared.
pub const WAVE_CLEAR_BONUS: u32 = 1_000;

/// Lifecycle phase reported by the host's game-state service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing is running yet; the title screen or a menu is visible.
    #[default]
    WaitingToStart,
    /// A round was requested and the formation is moving into frame.
    CountdownToStart,
    /// The round is live.
    Playing,
    /// The round ended.
    GameOver,
}

impl GamePhase {
    /// Reports whether formation motion is simulated during this phase.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::CountdownToStart | Self::Playing)
    }
}

/// Events broadcast by the host and consumed by the wave systems.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the game-state service entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// Indicates that a rendered frame elapsed.
    FrameAdvanced {
        /// Seconds of simulated time since the previous frame.
        dt: f32,
    },
    /// Periodic notification from the shot clock.
    ShotClockTicked {
        /// Handler currently allowed to fire.
        selected: HandlerId,
    },
    /// Reports that the enemy occupying a slot was destroyed by the player.
    EnemyKilled {
        /// Grid slot of the enemy.
        slot: SlotCoord,
    },
    /// Reports that an enemy requested the formation to recoil upward.
    EnemyBounced {
        /// Grid slot of the enemy.
        slot: SlotCoord,
    },
    /// Reports that a spawned enemy actor lacks its behaviour component, so its
    /// callbacks could not be attached.
    EnemyWiringFailed {
        /// Grid slot of the misconfigured enemy.
        slot: SlotCoord,
    },
    /// Reports that the bonus surveyor collided with the ball.
    SurveyorHit {
        /// World position of the surveyor at the moment of the hit.
        position: Vec2,
    },
}

/// Commands emitted by the wave systems for the host to execute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Instantiates an enemy actor for the provided slot.
    SpawnEnemy {
        /// Grid slot that owns the enemy.
        slot: SlotCoord,
        /// Variant to instantiate.
        kind: EnemyKind,
        /// World position at which the actor appears.
        position: Vec2,
    },
    /// Destroys the enemy actor occupying the provided slot.
    DestroyEnemy {
        /// Grid slot whose actor should be removed.
        slot: SlotCoord,
    },
    /// Instantiates an enemy projectile.
    SpawnProjectile {
        /// World position the projectile starts from.
        position: Vec2,
    },
    /// Adds points to the player's score.
    AddScore {
        /// Number of points to add.
        points: u32,
    },
    /// Increments the scoring service's kill counters.
    RecordKill {
        /// Variant of the destroyed enemy.
        kind: EnemyKind,
    },
    /// Asks the game-state service to finish the countdown and begin play.
    EndCountdown,
    /// Asks the shot clock to hand the firing slot to another handler.
    SelectNewShooter,
    /// Instantiates a pickup dropped by the surveyor.
    SpawnDrop {
        /// World position of the pickup.
        position: Vec2,
    },
    /// Deactivates the surveyor actor.
    DestroySurveyor,
}

/// Variants of enemy actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular formation member.
    Basic,
    /// Formation member placed on the middle row.
    Special,
    /// Bonus enemy that travels outside the formation.
    Surveyor,
}

/// Projectile targeting patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirePattern {
    /// Sweeps sideways and drops a row at every edge.
    ZigZag,
    /// Walks straight down columns, repeating for a number of sweeps.
    Rain,
    /// Picks a random sideways direction on every step.
    Wild,
}

impl FirePattern {
    /// Every available pattern in declaration order.
    pub const ALL: [FirePattern; 3] = [Self::ZigZag, Self::Rain, Self::Wild];
}

/// Identifier of a handler that can be selected by the shot clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerId(u32);

impl HandlerId {
    /// Creates a new handler identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a formation slot expressed as column and row indices.
///
/// Row zero is the row closest to the formation's pivot; the last row is the
/// outermost one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotCoord {
    column: u32,
    row: u32,
}

impl SlotCoord {
    /// Creates a new slot coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the slot.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the slot.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Immutable representation of a single formation slot used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Variant occupying the slot.
    pub kind: EnemyKind,
    /// Whether the enemy is still alive.
    pub alive: bool,
    /// Current world position of the enemy.
    pub position: Vec2,
}

/// Read-only snapshot of every slot in a formation.
#[derive(Clone, Debug, Default)]
pub struct FormationView {
    columns: u32,
    rows: u32,
    slots: Vec<Option<EnemySnapshot>>,
}

impl FormationView {
    /// Creates a view from column-major slot snapshots.
    ///
    /// Missing trailing entries are treated as empty slots.
    #[must_use]
    pub fn from_slots(columns: u32, rows: u32, mut slots: Vec<Option<EnemySnapshot>>) -> Self {
        let len = columns as usize * rows as usize;
        slots.resize(len, None);
        Self {
            columns,
            rows,
            slots,
        }
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Returns the snapshot stored in the provided slot, if any.
    #[must_use]
    pub fn enemy(&self, slot: SlotCoord) -> Option<&EnemySnapshot> {
        self.index(slot)
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
    }

    /// Returns the world position of the slot's enemy when it is alive.
    #[must_use]
    pub fn live_position(&self, slot: SlotCoord) -> Option<Vec2> {
        self.enemy(slot)
            .filter(|enemy| enemy.alive)
            .map(|enemy| enemy.position)
    }

    /// Counts the enemies that are still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().filter(|enemy| enemy.alive).count()
    }

    /// Iterator over occupied slots in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotCoord, &EnemySnapshot)> + '_ {
        let rows = self.rows.max(1);
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| {
                let enemy = slot.as_ref()?;
                let column = u32::try_from(index).ok()? / rows;
                let row = u32::try_from(index).ok()? % rows;
                Some((SlotCoord::new(column, row), enemy))
            })
    }

    fn index(&self, slot: SlotCoord) -> Option<usize> {
        if slot.column() < self.columns && slot.row() < self.rows {
            let column = usize::try_from(slot.column()).ok()?;
            let row = usize::try_from(slot.row()).ok()?;
            let height = usize::try_from(self.rows).ok()?;
            Some(column * height + row)
        } else {
            None
        }
    }
}
