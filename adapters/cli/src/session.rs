//! Headless stand-ins for the engine services that drive the wave systems.

use anyhow::{Context, Result};
use glam::Vec2;
use landers_core::{Command, EnemyKind, Event, FormationView, GamePhase, HandlerId, SlotCoord};
use landers_system_formation::FormationController;
use landers_system_projectile_director::ProjectileDirector;
use landers_system_surveyor::Surveyor;
use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::settings::{SessionConfig, Settings};

/// Totals gathered while the session runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) frames: u64,
    pub(crate) score: u64,
    pub(crate) kills: u64,
    pub(crate) projectiles: u64,
    pub(crate) waves_cleared: u64,
    pub(crate) shooter_changes: u64,
}

/// Periodic shot clock that selects which handler may fire.
#[derive(Debug)]
struct ShotClock {
    interval: f32,
    elapsed: f32,
    handler_count: u32,
    selected: HandlerId,
}

impl ShotClock {
    fn advance(&mut self, dt: f32, out: &mut Vec<Event>) {
        self.elapsed += dt;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            out.push(Event::ShotClockTicked {
                selected: self.selected,
            });
        }
    }

    fn reselect(&mut self, rng: &mut ChaCha8Rng) {
        self.selected = HandlerId::new(rng.gen_range(0..self.handler_count));
    }
}

/// Wires the wave systems to a scripted game-state service, shot clock,
/// scoring tally and player.
#[derive(Debug)]
pub(crate) struct Session {
    formation: FormationController,
    director: ProjectileDirector,
    surveyor: Surveyor,
    config: SessionConfig,
    phase: GamePhase,
    shot_clock: ShotClock,
    rng: ChaCha8Rng,
    pending: Vec<Event>,
    summary: Summary,
}

impl Session {
    pub(crate) fn new(settings: &Settings) -> Result<Self> {
        let formation = FormationController::new(settings.formation.clone())
            .context("failed to build formation controller")?;
        let director = ProjectileDirector::new(settings.director)
            .context("failed to build projectile director")?;
        let config = settings.session;

        Ok(Self {
            formation,
            director,
            surveyor: Surveyor::new(settings.surveyor),
            shot_clock: ShotClock {
                interval: config.shot_interval,
                elapsed: 0.0,
                handler_count: config.handler_count,
                selected: settings.director.handler_id,
            },
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            phase: GamePhase::WaitingToStart,
            pending: Vec::new(),
            summary: Summary::default(),
            config,
        })
    }

    /// Requests a new round; the systems observe it on the next frame.
    pub(crate) fn start_round(&mut self) {
        self.set_phase(GamePhase::CountdownToStart);
    }

    pub(crate) fn summary(&self) -> Summary {
        self.summary
    }

    /// Runs one frame and hands every produced command to `sink`.
    pub(crate) fn step<F>(&mut self, dt: f32, mut sink: F) -> Result<()>
    where
        F: FnMut(&Command) -> Result<()>,
    {
        self.summary.frames += 1;
        let frame = self.summary.frames;

        let mut events = std::mem::take(&mut self.pending);
        events.push(Event::FrameAdvanced { dt });
        if self.phase == GamePhase::Playing {
            self.script_player(frame, &mut events);
            self.shot_clock.advance(dt, &mut events);
        }

        let mut formation_out = Vec::new();
        self.formation.handle(&events, &mut formation_out);
        self.summary.waves_cleared += formation_out
            .iter()
            .filter(|command| matches!(command, Command::AddScore { .. }))
            .count() as u64;

        let view = self.formation.view();
        let mut out = formation_out;
        self.director.handle(&events, &view, &mut out);
        self.surveyor.handle(&events, &mut out);

        for command in &out {
            sink(command)?;
            self.execute(command);
        }
        Ok(())
    }

    fn script_player(&mut self, frame: u64, events: &mut Vec<Event>) {
        let view = self.formation.view();

        if every(frame, self.config.bounce_every) {
            if let Some(slot) = pick_live(&view, &mut self.rng, |kind| kind == EnemyKind::Special) {
                events.push(Event::EnemyBounced { slot });
            }
        }
        if every(frame, self.config.kill_every) {
            if let Some(slot) = pick_live(&view, &mut self.rng, |_| true) {
                events.push(Event::EnemyKilled { slot });
            }
        }
        if every(frame, self.config.surveyor_every) {
            let position = Vec2::new(self.rng.gen_range(-20.0..20.0), 30.0);
            events.push(Event::SurveyorHit { position });
        }
    }

    fn execute(&mut self, command: &Command) {
        match *command {
            Command::EndCountdown => self.set_phase(GamePhase::Playing),
            Command::SelectNewShooter => {
                self.summary.shooter_changes += 1;
                self.shot_clock.reselect(&mut self.rng);
            }
            Command::AddScore { points } => self.summary.score += u64::from(points),
            Command::RecordKill { .. } => self.summary.kills += 1,
            Command::SpawnProjectile { .. } => self.summary.projectiles += 1,
            Command::SpawnEnemy { .. }
            | Command::DestroyEnemy { .. }
            | Command::SpawnDrop { .. }
            | Command::DestroySurveyor => {}
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        info!(?phase, "game phase changed");
        self.phase = phase;
        self.pending.push(Event::PhaseChanged { phase });
    }
}

fn every(frame: u64, interval: u32) -> bool {
    interval != 0 && frame % u64::from(interval) == 0
}

fn pick_live<F>(view: &FormationView, rng: &mut ChaCha8Rng, filter: F) -> Option<SlotCoord>
where
    F: Fn(EnemyKind) -> bool,
{
    view.iter()
        .filter(|(_, enemy)| enemy.alive && filter(enemy.kind))
        .map(|(slot, _)| slot)
        .choose(rng)
}
