//! Grid cursor walked by the firing patterns.

use landers_core::{FirePattern, SlotCoord};
use rand::Rng;

/// Sideways heading of the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Toward column zero.
    Left,
    /// Toward the last column.
    Right,
}

impl Heading {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// Outcome of advancing the cursor by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The cursor still points inside the pattern.
    Continue,
    /// The pattern finished its sweep; the cursor must be rerolled.
    Exhausted,
}

/// Position and pattern state of the firing cursor.
///
/// `row` is signed because a sweep finishes by stepping past row zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Column the next shot is attempted from.
    pub column: i32,
    /// Row the next shot is attempted from.
    pub row: i32,
    /// Active pattern.
    pub pattern: FirePattern,
    /// Sideways heading used by ZigZag and Wild.
    pub heading: Heading,
    /// Vertical sweeps the Rain pattern still repeats.
    pub dwell: u32,
}

impl Cursor {
    /// Picks a uniformly random pattern, column, heading and dwell, starting
    /// from the outermost row. `dwell` is drawn from `dwell_min..dwell_max`.
    pub fn random<R: Rng + ?Sized>(
        columns: u32,
        rows: u32,
        dwell_min: u32,
        dwell_max: u32,
        rng: &mut R,
    ) -> Self {
        let pattern = FirePattern::ALL[rng.gen_range(0..FirePattern::ALL.len())];
        let column = random_column(columns, rng);
        let heading = Heading::random(rng);
        let dwell = if dwell_min < dwell_max {
            rng.gen_range(dwell_min..dwell_max)
        } else {
            dwell_min
        };

        Self {
            column,
            row: last_row(rows),
            pattern,
            heading,
            dwell,
        }
    }

    /// Slot under the cursor, if it lies inside a `columns` x `rows` grid.
    #[must_use]
    pub fn slot(&self, columns: u32, rows: u32) -> Option<SlotCoord> {
        let column = u32::try_from(self.column).ok()?;
        let row = u32::try_from(self.row).ok()?;
        (column < columns && row < rows).then(|| SlotCoord::new(column, row))
    }

    /// Advances the cursor by one step of its pattern.
    pub fn advance<R: Rng + ?Sized>(&mut self, columns: u32, rows: u32, rng: &mut R) -> Advance {
        match self.pattern {
            FirePattern::ZigZag => {
                self.step_sideways(columns);
                self.check_bottom()
            }
            FirePattern::Wild => {
                self.heading = Heading::random(rng);
                self.step_sideways(columns);
                self.check_bottom()
            }
            FirePattern::Rain => self.step_down(columns, rows, rng),
        }
    }

    /// Moves one column along the heading; at an edge the heading flips and
    /// the cursor drops a row instead.
    fn step_sideways(&mut self, columns: u32) {
        let last = last_column(columns);
        match self.heading {
            Heading::Left if self.column <= 0 => {
                self.heading = Heading::Right;
                self.column = (self.column + 1).min(last);
                self.row -= 1;
            }
            Heading::Left => self.column -= 1,
            Heading::Right if self.column >= last => {
                self.heading = Heading::Left;
                self.column = (self.column - 1).max(0);
                self.row -= 1;
            }
            Heading::Right => self.column += 1,
        }
    }

    fn step_down<R: Rng + ?Sized>(&mut self, columns: u32, rows: u32, rng: &mut R) -> Advance {
        if self.dwell == 0 {
            return Advance::Exhausted;
        }

        if self.row <= 0 {
            self.dwell -= 1;
            self.row = last_row(rows);
            self.column = random_column(columns, rng);
        } else {
            self.row -= 1;
        }
        Advance::Continue
    }

    fn check_bottom(&self) -> Advance {
        if self.row < 0 {
            Advance::Exhausted
        } else {
            Advance::Continue
        }
    }
}

fn random_column<R: Rng + ?Sized>(columns: u32, rng: &mut R) -> i32 {
    if columns == 0 {
        return 0;
    }
    i32::try_from(rng.gen_range(0..columns)).unwrap_or(i32::MAX)
}

fn last_column(columns: u32) -> i32 {
    i32::try_from(columns).unwrap_or(i32::MAX).saturating_sub(1).max(0)
}

fn last_row(rows: u32) -> i32 {
    i32::try_from(rows).unwrap_or(i32::MAX) - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn single_column_drops_on_every_sideways_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut cursor = Cursor {
            column: 0,
            row: 2,
            pattern: FirePattern::Wild,
            heading: Heading::Left,
            dwell: 0,
        };

        assert_eq!(cursor.advance(1, 3, &mut rng), Advance::Continue);
        assert_eq!((cursor.column, cursor.row), (0, 1));
        assert_eq!(cursor.advance(1, 3, &mut rng), Advance::Continue);
        assert_eq!(cursor.advance(1, 3, &mut rng), Advance::Exhausted);
        assert_eq!(cursor.row, -1);
    }

    #[test]
    fn slot_rejects_out_of_range_positions() {
        let cursor = Cursor {
            column: 3,
            row: -1,
            pattern: FirePattern::ZigZag,
            heading: Heading::Left,
            dwell: 0,
        };
        assert_eq!(cursor.slot(4, 2), None);
        assert_eq!(
            Cursor { row: 1, ..cursor }.slot(4, 2),
            Some(SlotCoord::new(3, 1))
        );
        assert_eq!(Cursor { row: 1, ..cursor }.slot(3, 2), None);
    }

    #[test]
    fn random_cursor_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..500 {
            let cursor = Cursor::random(11, 5, 4, 12, &mut rng);
            assert!((0..11).contains(&cursor.column));
            assert_eq!(cursor.row, 4);
            assert!((4..12).contains(&cursor.dwell));
        }
    }
}
