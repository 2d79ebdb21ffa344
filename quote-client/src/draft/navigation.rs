//! Navigation controller
//!
//! ```text
//!  1 ──▶ 2 ──▶ 3 ──▶ 4 ──▶ 5
//!  ◀──────────────────────── (backward: always)
//! ```
//!
//! Forward moves are bounded by `max_reachable`, derived from the step flags.
//! A refused move is a no-op, never an error.

use shared::quote::{FIRST_STEP, LAST_STEP};

use super::validation::StepValidation;

/// A step change that actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: u8,
    pub to: u8,
}

/// Step pointer plus the transition policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationController {
    current: u8,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    pub fn new() -> Self {
        Self { current: FIRST_STEP }
    }

    /// Start at a restored step (clamped into range)
    pub fn at(step: u8) -> Self {
        Self {
            current: step.clamp(FIRST_STEP, LAST_STEP),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current
    }

    /// `max(current, highest valid step) + 1`, clamped to the last step
    pub fn max_reachable(&self, validation: &StepValidation) -> u8 {
        (self.current.max(validation.highest_valid()) + 1).min(LAST_STEP)
    }

    pub fn can_go_to(&self, target: u8, validation: &StepValidation) -> bool {
        (FIRST_STEP..=LAST_STEP).contains(&target) && target <= self.max_reachable(validation)
    }

    /// Move to `target` if the policy allows it
    ///
    /// Returns `None` when the move is refused or `target` is the current step.
    pub fn go_to(&mut self, target: u8, validation: &StepValidation) -> Option<Transition> {
        if target == self.current || !self.can_go_to(target, validation) {
            return None;
        }
        let transition = Transition {
            from: self.current,
            to: target,
        };
        self.current = target;
        Some(transition)
    }

    pub fn next(&mut self, validation: &StepValidation) -> Option<Transition> {
        if self.current >= LAST_STEP {
            return None;
        }
        self.go_to(self.current + 1, validation)
    }

    pub fn previous(&mut self, validation: &StepValidation) -> Option<Transition> {
        if self.current <= FIRST_STEP {
            return None;
        }
        self.go_to(self.current - 1, validation)
    }
}
