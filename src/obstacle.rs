//! Obstacle pairs: spawning, motion and the overlap / pass tests.

use crate::tuning::Tuning;
use fastrand::Rng;

/// Identifier of one obstacle pair. Strictly increasing within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

/// One rectangle in play-field percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Half {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePair {
    pub id: ObstacleId,
    pub left: f64,
    pub width: f64,
    pub top_height: u32,
    pub gap: u32,
    pub bottom_height: u32,
}

impl ObstaclePair {
    pub fn new(id: ObstacleId, top_height: u32, tuning: &Tuning) -> Self {
        let gap = tuning.gap;
        Self {
            id,
            left: tuning.spawn_left,
            width: tuning.obstacle_width,
            top_height,
            gap,
            bottom_height: 100 - top_height - gap,
        }
    }

    pub fn top_half(&self) -> Half {
        Half {
            left: self.left,
            top: 0.0,
            width: self.width,
            height: self.top_height as f64,
        }
    }

    pub fn bottom_half(&self) -> Half {
        Half {
            left: self.left,
            top: (self.top_height + self.gap) as f64,
            width: self.width,
            height: self.bottom_height as f64,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// True when the pair spans the character's hit band and `position`
    /// lies outside the gap.
    pub fn collides(&self, position: f64, tuning: &Tuning) -> bool {
        let spans = self.left < tuning.hit_right && self.right() > tuning.hit_left;
        let gap_top = self.top_height as f64;
        let gap_bottom = (self.top_height + self.gap) as f64;
        spans && (position < gap_top || position > gap_bottom)
    }

    /// True once the trailing edge is behind the character.
    pub fn cleared(&self, tuning: &Tuning) -> bool {
        self.right() < tuning.hit_left
    }
}

pub struct Spawner {
    rng: Rng,
    next_id: u64,
}

impl Spawner {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self { rng, next_id: 0 }
    }

    pub fn spawn(&mut self, tuning: &Tuning) -> ObstaclePair {
        let top = self.rng.u32(tuning.min_top..tuning.max_top);
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        ObstaclePair::new(id, top, tuning)
    }
}

/// Move every pair left by `speed` and drop the ones fully off screen.
/// Returns how many pairs were removed.
pub fn step(pairs: &mut Vec<ObstaclePair>, speed: f64, exit_left: f64) -> usize {
    for p in pairs.iter_mut() {
        p.left -= speed;
    }
    let before = pairs.len();
    pairs.retain(|p| p.left > exit_left);
    before - pairs.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_at(left: f64, top: u32) -> ObstaclePair {
        let mut p = ObstaclePair::new(ObstacleId(0), top, &Tuning::default());
        p.left = left;
        p
    }

    #[test]
    fn halves_and_gap_fill_the_field() {
        let t = Tuning::default();
        let mut spawner = Spawner::new(Some(7));
        for _ in 0..200 {
            let p = spawner.spawn(&t);
            assert!((t.min_top..t.max_top).contains(&p.top_height));
            assert_eq!(p.top_height + p.gap + p.bottom_height, 100);
            let bottom = p.bottom_half();
            assert_eq!(bottom.top + bottom.height, 100.0);
            assert_eq!(p.left, 100.0);
        }
    }

    #[test]
    fn ids_strictly_increase() {
        let t = Tuning::default();
        let mut spawner = Spawner::new(None);
        let a = spawner.spawn(&t).id;
        let b = spawner.spawn(&t).id;
        let c = spawner.spawn(&t).id;
        assert!(a < b && b < c);
    }

    #[test]
    fn collision_needs_horizontal_overlap() {
        let t = Tuning::default();
        // gap is 30..55
        assert!(pair_at(20.0, 30).collides(10.0, &t));
        assert!(pair_at(20.0, 30).collides(60.0, &t));
        assert!(!pair_at(20.0, 30).collides(40.0, &t));
        assert!(!pair_at(40.0, 30).collides(10.0, &t));
        // right edge exactly at the hit band is not an overlap
        assert!(!pair_at(5.0, 30).collides(10.0, &t));
    }

    #[test]
    fn gap_edges_are_safe() {
        let t = Tuning::default();
        let p = pair_at(18.0, 30);
        assert!(!p.collides(30.0, &t));
        assert!(!p.collides(55.0, &t));
    }

    #[test]
    fn cleared_once_trailing_edge_passes() {
        let t = Tuning::default();
        assert!(!pair_at(5.0, 20).cleared(&t));
        assert!(pair_at(4.9, 20).cleared(&t));
    }

    #[test]
    fn step_moves_then_retires_off_screen_pairs() {
        let mut pairs = vec![pair_at(50.0, 20), pair_at(-8.0, 20)];
        let removed = step(&mut pairs, 3.0, -10.0);
        assert_eq!(removed, 1);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left, 47.0);
    }

    #[test]
    fn pair_landing_on_exit_line_is_removed_same_step() {
        let mut pairs = vec![pair_at(-7.0, 20)];
        assert_eq!(step(&mut pairs, 3.0, -10.0), 1);
        assert!(pairs.is_empty());
    }
}
