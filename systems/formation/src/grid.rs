//! Slot arena and analytic geometry of the formation.

use glam::Vec2;
use landers_core::{Command, EnemyKind, EnemySnapshot, FormationView, SlotCoord};

use crate::config::Config;

/// Enemy stored in a formation slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EnemySlot {
    pub(crate) kind: EnemyKind,
    pub(crate) alive: bool,
    /// Cleared when the host could not attach the enemy's callbacks.
    pub(crate) wired: bool,
}

/// Column-major arena of enemy slots plus the per-column pivots they hang from.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    slots: Vec<Option<EnemySlot>>,
    column_angles: Vec<f32>,
    origin: Vec2,
    base_radius: f32,
    height_padding: f32,
    formation_rotation: f32,
    radial_offset: f32,
}

impl Grid {
    pub(crate) fn new(config: &Config) -> Self {
        let len = config.columns as usize * config.rows as usize;
        Self {
            columns: config.columns,
            rows: config.rows,
            slots: vec![None; len],
            column_angles: vec![0.0; config.columns as usize],
            origin: config.origin,
            base_radius: config.base_radius,
            height_padding: config.height_padding,
            formation_rotation: config.starting_degree - 90.0,
            radial_offset: 0.0,
        }
    }

    /// Fills every slot with a fresh enemy and emits the matching spawn commands.
    pub(crate) fn populate(&mut self, config: &Config, out: &mut Vec<Command>) {
        self.formation_rotation = config.starting_degree - 90.0;
        self.radial_offset = 0.0;

        let spacing = config.degrees_between_invaders;
        let half_span = self.columns as f32 * spacing / 2.0;
        let special_row = self.rows / 2;

        for column in 0..self.columns {
            self.column_angles[column as usize] = spacing * column as f32 + 90.0 - half_span;

            for row in 0..self.rows {
                let slot = SlotCoord::new(column, row);
                let kind = if row == special_row {
                    EnemyKind::Special
                } else {
                    EnemyKind::Basic
                };
                if let Some(index) = self.index(slot) {
                    self.slots[index] = Some(EnemySlot {
                        kind,
                        alive: true,
                        wired: true,
                    });
                }
                out.push(Command::SpawnEnemy {
                    slot,
                    kind,
                    position: self.position(slot),
                });
            }
        }
    }

    /// Empties every slot, emitting a destroy command for each occupied one.
    pub(crate) fn clear(&mut self, out: &mut Vec<Command>) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                let (column, row) = split_index(index, self.rows);
                out.push(Command::DestroyEnemy {
                    slot: SlotCoord::new(column, row),
                });
            }
        }
    }

    pub(crate) fn is_populated(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    pub(crate) fn enemy_mut(&mut self, slot: SlotCoord) -> Option<&mut EnemySlot> {
        let index = self.index(slot)?;
        self.slots.get_mut(index)?.as_mut()
    }

    /// Moves every enemy along its column's radius; positive values move outward.
    pub(crate) fn translate(&mut self, delta: f32) {
        self.radial_offset += delta;
    }

    pub(crate) fn rotate_columns(&mut self, degrees: f32) {
        for angle in &mut self.column_angles {
            *angle += degrees;
        }
    }

    pub(crate) fn column_angles(&self) -> &[f32] {
        &self.column_angles
    }

    pub(crate) fn radial_offset(&self) -> f32 {
        self.radial_offset
    }

    /// Angles, normalised to `[0, 360)`, of the columns holding a live enemy.
    pub(crate) fn live_column_angles(&self) -> impl Iterator<Item = f32> + '_ {
        let rows = self.rows as usize;
        self.column_angles
            .iter()
            .enumerate()
            .filter(move |(column, _)| {
                let start = column * rows;
                self.slots[start..start + rows]
                    .iter()
                    .flatten()
                    .any(|enemy| enemy.alive)
            })
            .map(|(_, angle)| angle.rem_euclid(360.0))
    }

    pub(crate) fn position(&self, slot: SlotCoord) -> Vec2 {
        let column_angle = self
            .column_angles
            .get(slot.column() as usize)
            .copied()
            .unwrap_or_default();
        let angle = (self.formation_rotation + column_angle).to_radians();
        let height =
            self.base_radius + slot.row() as f32 * self.height_padding + self.radial_offset;
        self.origin + Vec2::new(-angle.sin(), angle.cos()) * height
    }

    pub(crate) fn view(&self) -> FormationView {
        let snapshots = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.map(|enemy| {
                    let (column, row) = split_index(index, self.rows);
                    EnemySnapshot {
                        kind: enemy.kind,
                        alive: enemy.alive,
                        position: self.position(SlotCoord::new(column, row)),
                    }
                })
            })
            .collect();
        FormationView::from_slots(self.columns, self.rows, snapshots)
    }

    fn index(&self, slot: SlotCoord) -> Option<usize> {
        if slot.column() < self.columns && slot.row() < self.rows {
            Some(slot.column() as usize * self.rows as usize + slot.row() as usize)
        } else {
            None
        }
    }
}

fn split_index(index: usize, rows: u32) -> (u32, u32) {
    let rows = rows.max(1) as usize;
    ((index / rows) as u32, (index % rows) as u32)
}
