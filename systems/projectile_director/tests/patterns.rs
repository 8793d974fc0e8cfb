use std::collections::HashSet;

use glam::Vec2;
use landers_core::{
    Command, EnemyKind, EnemySnapshot, Event, FirePattern, FormationView, GamePhase, HandlerId,
    SlotCoord,
};
use landers_system_projectile_director::{Advance, Config, Cursor, Heading, ProjectileDirector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const COLUMNS: u32 = 11;
const ROWS: u32 = 5;

fn cursor(pattern: FirePattern, column: i32, row: i32, heading: Heading) -> Cursor {
    Cursor {
        column,
        row,
        pattern,
        heading,
        dwell: 0,
    }
}

fn formation<F>(alive: F) -> FormationView
where
    F: Fn(SlotCoord) -> bool,
{
    let mut slots = Vec::new();
    for column in 0..COLUMNS {
        for row in 0..ROWS {
            let slot = SlotCoord::new(column, row);
            slots.push(Some(EnemySnapshot {
                kind: EnemyKind::Basic,
                alive: alive(slot),
                position: Vec2::new(column as f32, row as f32),
            }));
        }
    }
    FormationView::from_slots(COLUMNS, ROWS, slots)
}

fn tick(director: &mut ProjectileDirector, view: &FormationView, handler: u32) -> Vec<Command> {
    let mut out = Vec::new();
    director.handle(
        &[Event::ShotClockTicked {
            selected: HandlerId::new(handler),
        }],
        view,
        &mut out,
    );
    out
}

fn projectiles(commands: &[Command]) -> Vec<Vec2> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::SpawnProjectile { position } => Some(*position),
            _ => None,
        })
        .collect()
}

#[test]
fn zigzag_turns_and_drops_at_left_edge() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut cursor = cursor(FirePattern::ZigZag, 2, 4, Heading::Left);

    for expected_column in [1, 0] {
        assert_eq!(cursor.advance(COLUMNS, ROWS, &mut rng), Advance::Continue);
        assert_eq!((cursor.column, cursor.row), (expected_column, 4));
        assert_eq!(cursor.heading, Heading::Left);
    }

    assert_eq!(cursor.advance(COLUMNS, ROWS, &mut rng), Advance::Continue);
    assert_eq!(cursor.heading, Heading::Right);
    assert_eq!((cursor.column, cursor.row), (1, 3));
}

#[test]
fn zigzag_turns_and_drops_at_right_edge() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut cursor = cursor(FirePattern::ZigZag, 10, 1, Heading::Right);

    assert_eq!(cursor.advance(COLUMNS, ROWS, &mut rng), Advance::Continue);
    assert_eq!(cursor.heading, Heading::Left);
    assert_eq!((cursor.column, cursor.row), (9, 0));
}

#[test]
fn zigzag_exhausts_below_row_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut cursor = cursor(FirePattern::ZigZag, 0, 0, Heading::Left);

    assert_eq!(cursor.advance(COLUMNS, ROWS, &mut rng), Advance::Exhausted);
    assert_eq!(cursor.row, -1);
}

#[test]
fn rain_repeats_for_its_dwell_then_exhausts() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let dwell = 3;
    let mut cursor = Cursor {
        dwell,
        ..cursor(FirePattern::Rain, 5, 4, Heading::Left)
    };

    let mut decrements = 0;
    let mut steps = 0;
    loop {
        let before = cursor;
        let advance = cursor.advance(COLUMNS, ROWS, &mut rng);
        if advance == Advance::Exhausted {
            assert_eq!(before.dwell, 0);
            break;
        }

        if cursor.dwell < before.dwell {
            decrements += 1;
            assert_eq!(before.row, 0);
            assert_eq!(cursor.row, ROWS as i32 - 1);
            assert!((0..COLUMNS as i32).contains(&cursor.column));
        } else {
            assert_eq!(cursor.row, before.row - 1);
            assert_eq!(cursor.column, before.column);
        }
        steps += 1;
        assert!(steps < 100);
    }

    assert_eq!(decrements, dwell);
}

#[test]
fn wild_only_drops_rows_at_edges() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut cursor = cursor(FirePattern::Wild, 5, 4, Heading::Left);

    let mut steps = 0;
    loop {
        let before = cursor;
        let advance = cursor.advance(COLUMNS, ROWS, &mut rng);
        assert!((0..COLUMNS as i32).contains(&cursor.column));

        if cursor.row != before.row {
            assert_eq!(cursor.row, before.row - 1);
            assert!(before.column == 0 || before.column == COLUMNS as i32 - 1);
        } else {
            assert_eq!((cursor.column - before.column).abs(), 1);
        }

        if advance == Advance::Exhausted {
            assert!(cursor.row < 0);
            break;
        }
        steps += 1;
        assert!(steps < 100_000);
    }
}

#[test]
fn full_formation_fires_exactly_once_per_tick() {
    let mut director = ProjectileDirector::new(Config::default()).expect("valid config");
    let view = formation(|_| true);

    for _ in 0..200 {
        let out = tick(&mut director, &view, 0);
        assert_eq!(projectiles(&out).len(), 1, "unexpected commands: {out:?}");
    }
}

#[test]
fn dead_cells_never_fire() {
    let mut director = ProjectileDirector::new(Config::default()).expect("valid config");
    let view = formation(|_| false);

    let out = tick(&mut director, &view, 0);
    assert!(projectiles(&out).is_empty());
    assert_eq!(out, vec![Command::SelectNewShooter]);
}

#[test]
fn only_live_enemies_fire() {
    let survivor = SlotCoord::new(4, 0);
    let view = formation(|slot| slot == survivor);
    let mut director = ProjectileDirector::new(Config::default()).expect("valid config");

    let mut fired = 0;
    for _ in 0..500 {
        let out = tick(&mut director, &view, 0);
        let shots = projectiles(&out);
        assert!(shots.len() <= 1);
        for position in shots {
            assert_eq!(position, Vec2::new(4.0, 0.0));
            fired += 1;
        }
    }
    assert!(fired > 0, "the survivor never fired");
}

#[test]
fn unselected_director_stays_silent() {
    let mut director = ProjectileDirector::new(Config {
        handler_id: HandlerId::new(3),
        ..Config::default()
    })
    .expect("valid config");
    let view = formation(|_| true);

    assert!(tick(&mut director, &view, 1).is_empty());
    assert_eq!(projectiles(&tick(&mut director, &view, 3)).len(), 1);
}

#[test]
fn round_start_rerolls_every_pattern() {
    let view = formation(|_| true);
    let mut patterns = HashSet::new();

    for seed in 0..64 {
        let mut director = ProjectileDirector::new(Config {
            rng_seed: seed,
            ..Config::default()
        })
        .expect("valid config");
        director.handle(
            &[Event::PhaseChanged {
                phase: GamePhase::CountdownToStart,
            }],
            &view,
            &mut Vec::new(),
        );

        let cursor = director.cursor();
        assert_eq!(cursor.row, ROWS as i32 - 1);
        assert!((0..COLUMNS as i32).contains(&cursor.column));
        assert!((4..12).contains(&cursor.dwell));
        let _ = patterns.insert(cursor.pattern);
    }

    assert_eq!(patterns.len(), FirePattern::ALL.len());
}

#[test]
fn first_selected_tick_fires_from_round_start_cursor() {
    let view = formation(|_| true);

    for seed in 0..16 {
        let mut director = ProjectileDirector::new(Config {
            rng_seed: seed,
            ..Config::default()
        })
        .expect("valid config");
        director.handle(
            &[Event::PhaseChanged {
                phase: GamePhase::CountdownToStart,
            }],
            &view,
            &mut Vec::new(),
        );
        let rolled = *director.cursor();

        let out = tick(&mut director, &view, 0);
        assert_eq!(
            projectiles(&out),
            vec![Vec2::new(rolled.column as f32, rolled.row as f32)],
            "seed {seed}"
        );
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let view = formation(|slot| (slot.column() + slot.row()) % 3 == 0);
    let run = || {
        let mut director = ProjectileDirector::new(Config::default()).expect("valid config");
        let mut log = Vec::new();
        for index in 0..300_u32 {
            log.extend(tick(&mut director, &view, index % 2));
        }
        log
    };

    assert_eq!(run(), run());
}
