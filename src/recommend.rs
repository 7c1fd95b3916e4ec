//! Companion-product suggestions.
//!
//! The dashboard presents these as the work of a "Bundle Advisor" agent, but
//! they come from a fixed association table. [`RankingService`] is the seam a
//! real scoring service would plug into.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Upper bound on suggestions returned for one selection.
pub const MAX_SUGGESTIONS: usize = 4;

/// Companions per product id, in priority order.
const ASSOCIATIONS: &[(i32, &[(i32, &str)])] = &[
    (
        1,
        &[
            (4, "Fast chargers sell with USB-C cables"),
            (12, "Keeps bulk cable stock tidy"),
            (6, "Power banks are bought with spare cables"),
        ],
    ),
    (
        2,
        &[
            (4, "Fast chargers sell with Lightning cables"),
            (11, "Phone cases are a common add-on"),
        ],
    ),
    (3, &[(12, "Keeps bulk cable stock tidy")]),
    (
        4,
        &[
            (1, "Chargers ship without a cable"),
            (5, "Dealers stock car and wall chargers together"),
        ],
    ),
    (5, &[(1, "Car chargers ship without a cable")]),
    (
        6,
        &[
            (1, "Power banks need a charging cable"),
            (7, "Offer the higher capacity option"),
        ],
    ),
    (7, &[(1, "Power banks need a charging cable")]),
    (
        8,
        &[
            (9, "Offer a budget audio alternative"),
            (11, "Phone cases are a common add-on"),
        ],
    ),
    (9, &[(8, "Offer the premium audio upgrade")]),
    (
        10,
        &[
            (11, "Screen guards and cases are bought together"),
            (2, "Top attach item for phone accessories"),
        ],
    ),
    (11, &[(10, "Screen guards and cases are bought together")]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub product_id: i32,
    pub reason: &'static str,
}

const NO_COMPANIONS: &[(i32, &str)] = &[];

fn companions(product_id: i32) -> &'static [(i32, &'static str)] {
    ASSOCIATIONS
        .iter()
        .find(|(id, _)| *id == product_id)
        .map(|(_, list)| *list)
        .unwrap_or(NO_COMPANIONS)
}

/// Lazily walks the association table for a selection.
///
/// Consumed once; call [`recommend`] again for a fresh pass.
pub struct Recommendations<'a> {
    selected: &'a BTreeSet<i32>,
    sources: std::collections::btree_set::Iter<'a, i32>,
    current: std::slice::Iter<'static, (i32, &'static str)>,
    seen: HashSet<i32>,
    emitted: usize,
}

impl Iterator for Recommendations<'_> {
    type Item = Suggestion;

    fn next(&mut self) -> Option<Suggestion> {
        if self.emitted >= MAX_SUGGESTIONS {
            return None;
        }
        loop {
            for &(product_id, reason) in self.current.by_ref() {
                if self.selected.contains(&product_id) || !self.seen.insert(product_id) {
                    continue;
                }
                self.emitted += 1;
                return Some(Suggestion { product_id, reason });
            }
            let source = self.sources.next()?;
            self.current = companions(*source).iter();
        }
    }
}

/// Suggests companions for `selected`, walking ids in ascending order.
pub fn recommend(selected: &BTreeSet<i32>) -> Recommendations<'_> {
    Recommendations {
        selected,
        sources: selected.iter(),
        current: NO_COMPANIONS.iter(),
        seen: HashSet::new(),
        emitted: 0,
    }
}

/// Ranks companion products for a selection.
pub trait RankingService: Send + Sync {
    fn rank(&self, selected: &BTreeSet<i32>) -> Vec<Suggestion>;
}

/// [`RankingService`] backed by the fixed association table.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticRanking;

impl RankingService for StaticRanking {
    fn rank(&self, selected: &BTreeSet<i32>) -> Vec<Suggestion> {
        recommend(selected).collect()
    }
}
