//! Power-up effects and their timed reversal
//!
//! Picking up a power-up applies its effect immediately. Speed and paddle
//! effects are undone after a fixed wall-clock duration: each pickup pushes
//! a reversal record onto a min-heap keyed by expiry time, and the frame
//! loop polls the heap once per tick. Reversals act on whatever balls and
//! paddle are live when they fire.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::Serialize;

use super::state::{Ball, Paddle, PowerUpKind};
use crate::clamp_speed;
use crate::consts::*;

/// What a timed effect acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    Balls,
    Paddle,
}

impl PowerUpKind {
    /// Target of the reversal, `None` for one-shot effects
    pub fn reversal_target(self) -> Option<EffectTarget> {
        match self {
            PowerUpKind::Green | PowerUpKind::White => None,
            PowerUpKind::Red | PowerUpKind::Yellow => Some(EffectTarget::Balls),
            PowerUpKind::Size | PowerUpKind::Unsize => Some(EffectTarget::Paddle),
        }
    }
}

/// Visible bookkeeping entry for a picked-up effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Session time (seconds) when the effect ends
    pub expires_at: f64,
}

/// A scheduled undo of one activation
#[derive(Debug, Clone, Copy)]
struct PendingReversal {
    expires_at: f64,
    /// Activation order, breaks ties between equal expiry times
    seq: u64,
    kind: PowerUpKind,
}

impl PartialEq for PendingReversal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingReversal {}

impl PartialOrd for PendingReversal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingReversal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expires_at
            .total_cmp(&other.expires_at)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Apply a power-up's immediate effect
pub fn apply_effect(kind: PowerUpKind, balls: &mut Vec<Ball>, paddle: &mut Paddle) {
    match kind {
        PowerUpKind::Green => {
            if let Some(ball) = balls.iter_mut().find(|b| !b.should_stick && !b.stuck) {
                ball.should_stick = true;
            }
        }
        PowerUpKind::White => {
            let copies: Vec<Ball> = balls
                .iter()
                .flat_map(|ball| {
                    let mut same = ball.clone();
                    same.should_stick = false;
                    let mut mirrored = same.clone();
                    mirrored.dir.x = -mirrored.dir.x;
                    [same, mirrored]
                })
                .collect();
            balls.extend(copies);
        }
        PowerUpKind::Red => {
            for ball in balls.iter_mut() {
                ball.speed = clamp_speed(ball.speed * SPEED_UP_FACTOR);
            }
        }
        PowerUpKind::Yellow => {
            for ball in balls.iter_mut() {
                ball.speed = clamp_speed(ball.speed / SLOW_DOWN_FACTOR);
            }
        }
        PowerUpKind::Size => paddle.set_scale(paddle.scale_factor * GROW_FACTOR),
        PowerUpKind::Unsize => paddle.set_scale(paddle.scale_factor / SHRINK_FACTOR),
    }
}

/// Undo a timed effect on the live balls and paddle
///
/// Speed reversals use the nominal factor and are clamped back into the
/// legal speed range.
pub fn revert_effect(kind: PowerUpKind, balls: &mut [Ball], paddle: &mut Paddle) {
    match kind {
        PowerUpKind::Green | PowerUpKind::White => {}
        PowerUpKind::Red => {
            for ball in balls.iter_mut() {
                ball.speed = clamp_speed(ball.speed / SPEED_UP_FACTOR);
            }
        }
        PowerUpKind::Yellow => {
            for ball in balls.iter_mut() {
                ball.speed = clamp_speed(ball.speed * SLOW_DOWN_FACTOR);
            }
        }
        PowerUpKind::Size | PowerUpKind::Unsize => paddle.reset_scale(),
    }
}

/// Tracks active effects and pending reversals
#[derive(Debug, Clone)]
pub struct EffectManager {
    /// Seconds a timed effect lasts
    pub duration: f64,
    active: Vec<ActiveEffect>,
    pending: BinaryHeap<Reverse<PendingReversal>>,
    next_seq: u64,
}

impl EffectManager {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            active: Vec::new(),
            pending: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Apply a picked-up effect and schedule its reversal if it has one
    pub fn activate(
        &mut self,
        kind: PowerUpKind,
        balls: &mut Vec<Ball>,
        paddle: &mut Paddle,
        now: f64,
    ) {
        let expires_at = now + self.duration;
        self.active.push(ActiveEffect { kind, expires_at });
        apply_effect(kind, balls, paddle);

        if kind.reversal_target().is_some() {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.pending.push(Reverse(PendingReversal {
                expires_at,
                seq,
                kind,
            }));
            log::debug!("{} effect active until t={expires_at:.2}s", kind.as_str());
        } else {
            log::debug!("{} effect applied", kind.as_str());
        }
    }

    /// Run every reversal whose expiry has passed, oldest first
    pub fn fire_due(
        &mut self,
        balls: &mut [Ball],
        paddle: &mut Paddle,
        now: f64,
    ) -> Vec<PowerUpKind> {
        let mut fired = Vec::new();
        while let Some(Reverse(next)) = self.pending.peek() {
            if next.expires_at > now {
                break;
            }
            let Some(Reverse(reversal)) = self.pending.pop() else {
                break;
            };
            match reversal.kind.reversal_target() {
                Some(EffectTarget::Balls) => log::debug!(
                    "{} effect expired, reverting {} balls",
                    reversal.kind.as_str(),
                    balls.len()
                ),
                Some(EffectTarget::Paddle) => {
                    log::debug!("{} effect expired, resetting paddle", reversal.kind.as_str())
                }
                None => {}
            }
            revert_effect(reversal.kind, balls, paddle);
            fired.push(reversal.kind);
        }
        fired
    }

    /// Drop expired entries from the visible list
    pub fn prune(&mut self, now: f64) {
        self.active.retain(|effect| effect.expires_at > now);
    }

    /// Forget the visible list (level change); pending reversals still fire
    pub fn clear_active(&mut self) {
        self.active.clear();
    }

    pub fn active(&self) -> &[ActiveEffect] {
        &self.active
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest scheduled reversal time
    pub fn next_expiry(&self) -> Option<f64> {
        self.pending.peek().map(|Reverse(next)| next.expires_at)
    }
}
