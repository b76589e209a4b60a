//! The game session controller.
//!
//! A [`Session`] owns all mutable game state. The frame loop calls
//! [`Session::advance`] once per rendered frame; input handlers call the
//! command methods between frames. Nothing here touches the terminal.

use crate::highscore::HighScoreStore;
use crate::obstacle::{self, Half, ObstacleId, ObstaclePair, Spawner};
use crate::timer::Interval;
use crate::tuning::Tuning;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Duration;

/// Longest stretch of time a single frame may account for.
const MAX_FRAME_DT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Ended,
}

/// Things that happened since the last drain, for sound and logging.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started,
    Jumped,
    Scored(u32),
    SpeedUp(f64),
    Paused,
    Resumed,
    BossMode(bool),
    Ended {
        score: u32,
        high_score: u32,
        new_record: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Title,
    GameOver { score: u32, high_score: u32 },
}

/// Everything a renderer needs, in play-field percent.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub phase: Phase,
    pub character_top: f64,
    pub tilt: f64,
    pub obstacles: Vec<(Half, Half)>,
    pub score: u32,
    pub high_score: u32,
    pub boss_mode: bool,
    pub overlay: Option<Overlay>,
}

pub struct Session<S: HighScoreStore> {
    tuning: Tuning,
    store: S,
    spawner: Spawner,
    phase: Phase,
    score: u32,
    high_score: u32,
    speed: f64,
    boss_mode: bool,
    position: f64,
    tilt: f64,
    pairs: Vec<ObstaclePair>,
    passed: HashSet<ObstacleId>,
    spawn: Interval,
    motion: Interval,
    events: Vec<Event>,
}

impl<S: HighScoreStore> Session<S> {
    /// Create an idle session. The high score is read from `store` once.
    pub fn new(tuning: Tuning, store: S, seed: Option<u64>) -> Self {
        let high_score = store.load();
        debug!("Loaded high score {}", high_score);
        Self {
            spawn: Interval::new(tuning.spawn_period),
            motion: Interval::new(tuning.motion_period),
            speed: tuning.base_speed,
            position: tuning.start_position,
            store,
            spawner: Spawner::new(seed),
            phase: Phase::Idle,
            score: 0,
            high_score,
            boss_mode: false,
            tilt: 0.0,
            pairs: Vec::new(),
            passed: HashSet::new(),
            events: Vec::new(),
            tuning,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn boss_mode(&self) -> bool {
        self.boss_mode
    }

    pub fn pairs(&self) -> &[ObstaclePair] {
        &self.pairs
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Begin a fresh run. Also serves as restart from any phase.
    pub fn start(&mut self) {
        self.score = 0;
        self.pairs.clear();
        self.passed.clear();
        self.position = self.tuning.start_position;
        self.tilt = 0.0;
        self.speed = self.tuning.base_speed;
        self.spawn.arm();
        self.motion.arm();
        self.phase = Phase::Running;
        info!("Session started (best {})", self.high_score);
        self.events.push(Event::Started);
    }

    /// Space or click: start from the title or game-over screen, jump in play.
    pub fn press(&mut self) {
        match self.phase {
            Phase::Idle | Phase::Ended => self.start(),
            Phase::Running | Phase::Paused => self.jump(),
        }
    }

    pub fn jump(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.position -= self.tuning.jump;
        self.tilt = -30.0;
        self.events.push(Event::Jumped);
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => {
                debug!("Paused at score {}", self.score);
                self.events.push(Event::Paused);
                Phase::Paused
            }
            Phase::Paused => {
                debug!("Resumed");
                self.events.push(Event::Resumed);
                Phase::Running
            }
            other => other,
        };
    }

    pub fn toggle_boss_mode(&mut self) {
        self.boss_mode = !self.boss_mode;
        debug!("Boss mode {}", if self.boss_mode { "on" } else { "off" });
        self.events.push(Event::BossMode(self.boss_mode));
    }

    /// Run the timers for `dt` of wall time, then one frame tick.
    pub fn advance(&mut self, dt: Duration) {
        if self.phase != Phase::Running {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);

        for _ in 0..self.spawn.advance(dt) {
            let pair = self.spawner.spawn(&self.tuning);
            debug!("Spawned obstacle {:?} top={}", pair.id, pair.top_height);
            self.pairs.push(pair);
        }
        for _ in 0..self.motion.advance(dt) {
            let removed = obstacle::step(&mut self.pairs, self.speed, self.tuning.exit_left());
            if removed > 0 {
                debug!("Retired {} obstacle(s), {} active", removed, self.pairs.len());
            }
            // A long frame may carry a pair through the character and off
            // screen before the tick sees it.
            if self.check_hit() {
                return;
            }
            self.score_passes();
        }

        self.tick();
    }

    /// One animation frame of simulation.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.position += self.tuning.gravity;
        self.tilt = self.tuning.fall_tilt();

        if self.position <= self.tuning.ceiling || self.position >= self.tuning.floor {
            self.end();
            return;
        }

        if self.check_hit() {
            return;
        }

        self.score_passes();
    }

    /// End the run if any pair overlaps the character outside its gap.
    fn check_hit(&mut self) -> bool {
        let hit = self
            .pairs
            .iter()
            .find(|p| p.collides(self.position, &self.tuning))
            .map(|p| p.id);
        match hit {
            Some(id) => {
                debug!("Hit obstacle {:?} at {:.1}%", id, self.position);
                self.end();
                true
            }
            None => false,
        }
    }

    fn score_passes(&mut self) {
        for p in &self.pairs {
            if !p.cleared(&self.tuning) || !self.passed.insert(p.id) {
                continue;
            }
            self.score += 1;
            self.events.push(Event::Scored(self.score));
            if self.score % self.tuning.speed_every == 0 {
                self.speed += self.tuning.speed_step;
                debug!("Speed now {:.2}", self.speed);
                self.events.push(Event::SpeedUp(self.speed));
            }
        }
    }

    /// Stop the run, record the high score and show the game-over overlay.
    pub fn end(&mut self) {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            return;
        }
        self.phase = Phase::Ended;
        self.spawn.disarm();
        self.motion.disarm();

        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
            info!("New high score {}", self.high_score);
            if let Err(e) = self.store.save(self.high_score) {
                warn!("Failed to save high score: {:#}", e);
            }
        }
        info!(
            "Session ended: score {}, best {}",
            self.score, self.high_score
        );
        self.events.push(Event::Ended {
            score: self.score,
            high_score: self.high_score,
            new_record,
        });
    }

    pub fn render_state(&self) -> RenderState {
        let overlay = match self.phase {
            Phase::Idle => Some(Overlay::Title),
            Phase::Ended => Some(Overlay::GameOver {
                score: self.score,
                high_score: self.high_score,
            }),
            Phase::Running | Phase::Paused => None,
        };
        RenderState {
            phase: self.phase,
            character_top: self.position,
            tilt: self.tilt,
            obstacles: self
                .pairs
                .iter()
                .map(|p| (p.top_half(), p.bottom_half()))
                .collect(),
            score: self.score,
            high_score: self.high_score,
            boss_mode: self.boss_mode,
            overlay,
        }
    }
}
