//! Trail-based search state for [`BacktrackingSolver`](super::BacktrackingSolver).
//!
//! Each constraint keeps two counters over its terms: how many are fixed to
//! true and how many are still unfixed. Propagation reads only those
//! counters, so assigning a variable costs one update per watching
//! constraint and undoing it costs the same.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use super::model::{Comparator, CpModel, LinearConstraint};

pub(crate) struct SearchState<'m> {
    constraints: &'m [LinearConstraint],
    /// Variable index -> indices of constraints mentioning it.
    watches: Vec<Vec<usize>>,
    values: Vec<Option<bool>>,
    hints: Vec<Option<bool>>,
    /// Variable indices in assignment order.
    trail: Vec<usize>,
    true_count: Vec<i64>,
    unfixed: Vec<i64>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl<'m> SearchState<'m> {
    /// Builds the initial state. Every constraint is queued, so the first
    /// [`propagate`](Self::propagate) also checks constraints with empty
    /// expressions and forces those that are tight from the start.
    pub(crate) fn new(model: &'m CpModel) -> Self {
        let n = model.var_count();
        let constraints = model.constraints();

        let mut watches = vec![Vec::new(); n];
        let mut unfixed = Vec::with_capacity(constraints.len());
        for (ci, c) in constraints.iter().enumerate() {
            for v in c.expr.vars() {
                watches[v.index()].push(ci);
            }
            unfixed.push(c.expr.len() as i64);
        }

        let mut hints = vec![None; n];
        for &(var, value) in model.hints() {
            hints[var.index()] = Some(value);
        }

        Self {
            constraints,
            watches,
            values: vec![None; n],
            hints,
            trail: Vec::with_capacity(n),
            true_count: vec![0; constraints.len()],
            unfixed,
            queue: (0..constraints.len()).collect(),
            queued: vec![true; constraints.len()],
        }
    }

    pub(crate) fn values(&self) -> &[Option<bool>] {
        &self.values
    }

    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn assign(&mut self, var: usize, value: bool) {
        debug_assert!(self.values[var].is_none(), "variable {var} assigned twice");
        self.values[var] = Some(value);
        self.trail.push(var);
        for &ci in &self.watches[var] {
            self.unfixed[ci] -= 1;
            if value {
                self.true_count[ci] += 1;
            }
            if !self.queued[ci] {
                self.queued[ci] = true;
                self.queue.push_back(ci);
            }
        }
    }

    /// Unassigns every variable fixed after the trail had length `len`.
    pub(crate) fn undo_to(&mut self, len: usize) {
        while self.trail.len() > len {
            let Some(var) = self.trail.pop() else { break };
            let was_true = self.values[var] == Some(true);
            self.values[var] = None;
            for &ci in &self.watches[var] {
                self.unfixed[ci] += 1;
                if was_true {
                    self.true_count[ci] -= 1;
                }
            }
        }
    }

    /// Runs propagation to fixpoint. Returns `false` on conflict.
    pub(crate) fn propagate(&mut self) -> bool {
        let constraints = self.constraints;
        while let Some(ci) = self.queue.pop_front() {
            self.queued[ci] = false;
            let c = &constraints[ci];
            let (t, u, b) = (self.true_count[ci], self.unfixed[ci], c.bound);

            let too_many = t > b;
            let too_few = t + u < b;
            let conflict = match c.comparator {
                Comparator::Le => too_many,
                Comparator::Ge => too_few,
                Comparator::Eq => too_many || too_few,
            };
            if conflict {
                self.clear_queue();
                return false;
            }
            if u == 0 {
                continue;
            }

            let forced = match c.comparator {
                Comparator::Le if t == b => Some(false),
                Comparator::Ge if t + u == b => Some(true),
                Comparator::Eq if t == b => Some(false),
                Comparator::Eq if t + u == b => Some(true),
                _ => None,
            };
            if let Some(value) = forced {
                for v in c.expr.vars() {
                    if self.values[v.index()].is_none() {
                        self.assign(v.index(), value);
                    }
                }
            }
        }
        true
    }

    fn clear_queue(&mut self) {
        for ci in self.queue.drain(..) {
            self.queued[ci] = false;
        }
    }

    /// Picks the next decision as `(variable, first value)`, or `None` when
    /// every variable is fixed.
    ///
    /// Constraints that still need true terms (`Eq`/`Ge` below their bound)
    /// are served first, smallest unfixed count first. Within the chosen
    /// constraint a hinted-true variable is preferred; without one, the
    /// candidates are ranked by [`branch_score`](Self::branch_score). Once
    /// no demand is left, the first unfixed variable is tried at its hinted
    /// value, or false.
    pub(crate) fn select_branch(&self, rng: Option<&mut StdRng>) -> Option<(usize, bool)> {
        let mut best: Option<(usize, i64)> = None;
        for (ci, c) in self.constraints.iter().enumerate() {
            if c.comparator == Comparator::Le {
                continue;
            }
            let u = self.unfixed[ci];
            if u == 0 || self.true_count[ci] >= c.bound {
                continue;
            }
            if best.map_or(true, |(_, bu)| u < bu) {
                best = Some((ci, u));
            }
        }

        if let Some((ci, _)) = best {
            let open: Vec<usize> = self.constraints[ci]
                .expr
                .vars()
                .iter()
                .map(|v| v.index())
                .filter(|&i| self.values[i].is_none())
                .collect();
            let hinted: Vec<usize> = open
                .iter()
                .copied()
                .filter(|&i| self.hints[i] == Some(true))
                .collect();
            let pool = if hinted.is_empty() {
                self.best_scored(&open, ci)
            } else {
                hinted
            };
            let var = match rng {
                Some(rng) => pool.choose(rng).copied(),
                None => pool.first().copied(),
            }?;
            return Some((var, true));
        }

        self.values
            .iter()
            .position(Option::is_none)
            .map(|i| (i, self.hints[i].unwrap_or(false)))
    }

    /// Candidates of `open` sharing the highest [`branch_score`](Self::branch_score),
    /// in their original order.
    fn best_scored(&self, open: &[usize], chosen: usize) -> Vec<usize> {
        let scores: Vec<BranchScore> = open.iter().map(|&i| self.branch_score(i, chosen)).collect();
        let top = scores
            .iter()
            .copied()
            .fold(None, |acc: Option<BranchScore>, s| match acc {
                Some(b) if b >= s => Some(b),
                _ => Some(s),
            });
        open.iter()
            .zip(&scores)
            .filter(|&(_, &s)| Some(s) == top)
            .map(|(&i, _)| i)
            .collect()
    }

    /// How well the other constraints of `var` (all but `skip`) can take it
    /// being set to true, as `(slack, need, room)`, compared in that order.
    ///
    /// `slack` sums the remaining budget `bound - true_count` of every `Le`
    /// constraint on `var`. `need` is the largest share of a demand
    /// constraint's unfixed terms that must still become true. `room` is
    /// the smallest remaining slack share of an `Le` constraint, capped
    /// at 1.
    fn branch_score(&self, var: usize, skip: usize) -> BranchScore {
        let mut slack = 0i64;
        let mut need = 0.0f64;
        let mut room = 1.0f64;
        for &ci in &self.watches[var] {
            if ci == skip {
                continue;
            }
            let c = &self.constraints[ci];
            let t = self.true_count[ci];
            // var is unfixed, so every watching constraint has u >= 1
            let share = (c.bound - t) as f64 / self.unfixed[ci] as f64;
            match c.comparator {
                Comparator::Le => {
                    slack += c.bound - t;
                    room = room.min(share);
                }
                _ if c.bound > t => need = need.max(share),
                _ => {}
            }
        }
        (slack, need, room)
    }
}

type BranchScore = (i64, f64, f64);
