use crate::formula::{Formula, FormulaTable, ORE};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no formula produces {0}")]
    Unknown(String),

    #[error("{0} has an entry but no candidate formulas")]
    NoFormula(String),

    #[error("resolving {chemical} recursed {depth} levels deep, the formulas contain a cycle")]
    TooDeep { chemical: String, depth: usize },

    #[error("ore needed for {0} does not fit in 64 bits")]
    Overflow(String),
}

/// Units that were produced but not yet consumed, per chemical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leftovers(HashMap<String, u64>);

impl Leftovers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chemical: &str) -> u64 {
        self.0.get(chemical).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (&**k, v))
    }

    /// Removes up to `wanted` units, returning how many were available.
    fn take(&mut self, chemical: &str, wanted: u64) -> u64 {
        match self.0.get_mut(chemical) {
            Some(available) => {
                let used = wanted.min(*available);
                *available -= used;
                used
            }
            None => 0,
        }
    }

    fn credit(&mut self, chemical: &str, extra: u64) {
        *self.0.entry(chemical.into()).or_insert(0) += extra;
    }
}

/// Minimum ore consumed to supply `requested` more units of `target`.
///
/// Existing leftovers of every chemical visited are used up first, and any
/// overproduction is banked back into `leftovers`.
///
/// When a chemical has several formulas, each candidate is evaluated in
/// table order against the same `leftovers` and the cheapest is picked (the
/// first one on a tie). Sub-resolutions made while scoring the losing
/// candidates are *not* undone, so their leftovers stay banked even though
/// that production never happened. With one formula per chemical, as in
/// every puzzle input, this cannot arise; with several, the accounting may
/// be inconsistent.
pub fn resolve(
    table: &FormulaTable,
    target: &str,
    requested: u64,
    leftovers: &mut Leftovers,
) -> Result<u64, ResolveError> {
    let mut resolver = Resolver {
        table,
        leftovers,
        max_depth: table.len(),
    };
    resolver.resolve(target, requested, 0)
}

impl FormulaTable {
    /// Ore needed for `quantity` of `target`, starting with no leftovers.
    pub fn minimum_ore(&self, target: &str, quantity: u64) -> Result<u64, ResolveError> {
        resolve(self, target, quantity, &mut Leftovers::new())
    }
}

struct Resolver<'a> {
    table: &'a FormulaTable,
    leftovers: &'a mut Leftovers,
    // An acyclic table can't chain more chemicals than it has entries
    max_depth: usize,
}

impl Resolver<'_> {
    fn resolve(&mut self, target: &str, requested: u64, depth: usize) -> Result<u64, ResolveError> {
        let used = self.leftovers.take(target, requested);
        let remaining = requested - used;
        log::trace!(
            "{:depth$}{} x{}: {} from leftovers",
            "",
            target,
            requested,
            used,
            depth = depth * 2
        );
        if remaining == 0 {
            return Ok(0);
        }

        if target == ORE {
            return Ok(remaining);
        }

        let table = self.table;
        let candidates = table
            .producing(target)
            .ok_or_else(|| ResolveError::Unknown(target.into()))?;

        if depth > self.max_depth {
            return Err(ResolveError::TooDeep {
                chemical: target.into(),
                depth,
            });
        }

        let mut best: Option<(u64, u64)> = None;
        for formula in candidates {
            let (score, extra) = self.apply(formula, remaining, depth)?;
            log::trace!(
                "{:depth$}{} scores {} ore, {} extra",
                "",
                formula,
                score,
                extra,
                depth = depth * 2
            );
            if best.map_or(true, |(best_score, _)| score < best_score) {
                best = Some((score, extra));
            }
        }

        let (score, extra) = best.ok_or_else(|| ResolveError::NoFormula(target.into()))?;
        self.leftovers.credit(target, extra);
        Ok(score)
    }

    /// Runs `formula` enough times to cover `remaining`, returning the ore
    /// spent and the surplus produced.
    fn apply(
        &mut self,
        formula: &Formula,
        remaining: u64,
        depth: usize,
    ) -> Result<(u64, u64), ResolveError> {
        let overflow = || ResolveError::Overflow(formula.output.chemical.clone());

        let multiplier = rounding_up(remaining, formula.output.amount);
        let produced = formula
            .output
            .amount
            .checked_mul(multiplier)
            .ok_or_else(overflow)?;

        let mut score = 0u64;
        for input in &formula.inputs {
            let needed = input.amount.checked_mul(multiplier).ok_or_else(overflow)?;
            let ore = if input.chemical == ORE {
                needed
            } else {
                self.resolve(&input.chemical, needed, depth + 1)?
            };
            score = score.checked_add(ore).ok_or_else(overflow)?;
        }

        Ok((score, produced - remaining))
    }
}

fn rounding_up(a: u64, b: u64) -> u64 {
    match (a / b, a % b) {
        (v, 0) => v,
        (v, _) => v + 1,
    }
}
