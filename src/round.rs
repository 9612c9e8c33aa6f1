use crate::config::RoundRules;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundPhase {
    /// Banner showing, no spawning. Holds the time the banner has been up.
    Transition { elapsed: f32 },
    Active,
}

/// Outcome of one spawn-timer step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDecision {
    Spawn,
    Wait,
}

/// Round progression state machine. A round starts in
/// [`RoundPhase::Transition`] while its banner is shown, then becomes
/// [`RoundPhase::Active`] and issues its spawn quota on a timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundProgression {
    rules: RoundRules,
    round: u32,
    quota: u32,
    spawned: u32,
    spawn_timer: f32,
    spawn_interval: f32,
    phase: RoundPhase,
}

impl RoundProgression {
    /// Starts at round 1 with its banner showing.
    pub fn new(rules: RoundRules) -> Self {
        let mut rounds = Self {
            rules,
            round: 1,
            quota: 0,
            spawned: 0,
            spawn_timer: 0.0,
            spawn_interval: 0.0,
            phase: RoundPhase::Active,
        };
        rounds.reset_to_round_one();
        rounds
    }

    pub fn reset_to_round_one(&mut self) {
        self.enter_round(1);
    }

    fn enter_round(&mut self, round: u32) {
        self.round = round;
        self.quota = quota_for_round(&self.rules, round);
        self.spawn_interval = spawn_interval_for_round(&self.rules, round);
        self.spawned = 0;
        self.spawn_timer = 0.0;
        self.phase = RoundPhase::Transition { elapsed: 0.0 };
    }

    /// Advance the banner clock. No effect once the round is active.
    pub fn update_transition_timer(&mut self, dt: f32) {
        if let RoundPhase::Transition { elapsed } = self.phase {
            let elapsed = elapsed + dt;
            self.phase = if elapsed >= self.rules.transition_duration {
                RoundPhase::Active
            } else {
                RoundPhase::Transition { elapsed }
            };
        }
    }

    /// One step of the spawn timer. Returns the decision together with the
    /// state the caller should adopt; `self` is left untouched.
    pub fn spawn_step(&self, dt: f32) -> (SpawnDecision, Self) {
        let mut next = *self;
        if self.is_showing_transition() || self.spawned >= self.quota {
            return (SpawnDecision::Wait, next);
        }

        next.spawn_timer += dt;
        if next.spawn_timer >= next.spawn_interval {
            next.spawn_timer = 0.0;
            (SpawnDecision::Spawn, next)
        } else {
            (SpawnDecision::Wait, next)
        }
    }

    /// Applies [`spawn_step`](Self::spawn_step) in place. Call once per frame.
    pub fn should_spawn_asteroids(&mut self, dt: f32) -> bool {
        let (decision, next) = self.spawn_step(dt);
        *self = next;
        decision == SpawnDecision::Spawn
    }

    /// Record `count` asteroids as issued. The issued count never exceeds the
    /// quota; callers size their spawn with [`remaining`](Self::remaining).
    pub fn mark_asteroids_spawned(&mut self, count: u32) {
        self.spawned = (self.spawned + count).min(self.quota);
    }

    pub fn is_round_complete(&self, active_asteroids: usize) -> bool {
        !self.is_showing_transition() && self.spawned >= self.quota && active_asteroids == 0
    }

    pub fn advance_to_next_round(&mut self) {
        self.enter_round(self.round + 1);
    }

    pub fn current_round(&self) -> u32 {
        self.round
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn remaining(&self) -> u32 {
        self.quota - self.spawned
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    /// How many asteroids one spawn event should create
    pub fn asteroids_per_spawn(&self) -> u32 {
        self.rules.asteroids_per_spawn
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_showing_transition(&self) -> bool {
        matches!(self.phase, RoundPhase::Transition { .. })
    }
}

pub fn quota_for_round(rules: &RoundRules, round: u32) -> u32 {
    rules.initial_quota + round.saturating_sub(1) * rules.quota_increment
}

pub fn spawn_interval_for_round(rules: &RoundRules, round: u32) -> f32 {
    let interval =
        rules.initial_spawn_interval - round.saturating_sub(1) as f32 * rules.spawn_interval_decrease;
    interval.max(rules.min_spawn_interval)
}
