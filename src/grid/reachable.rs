//! Cost-aware movement search over the hex grid
//!
//! Dijkstra over terrain entry costs. Respects impassable terrain and a
//! caller-supplied blocking predicate (usually cell occupancy).

use ahash::AHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::grid::hex::HexCoord;

/// Node in the Dijkstra frontier
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrontierNode {
    coord: HexCoord,
    cost: u32,
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; coordinate tiebreak keeps pops deterministic
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| (other.coord.r, other.coord.q).cmp(&(self.coord.r, self.coord.q)))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every cell reachable within a movement budget, with the cheapest cost and
/// predecessor for each
#[derive(Debug, Clone, Default)]
pub struct Reachable {
    origin: HexCoord,
    costs: AHashMap<HexCoord, u32>,
    came_from: AHashMap<HexCoord, HexCoord>,
}

impl Reachable {
    /// A set holding only the origin
    pub fn origin_only(origin: HexCoord) -> Self {
        let mut costs = AHashMap::new();
        costs.insert(origin, 0);
        Self {
            origin,
            costs,
            came_from: AHashMap::new(),
        }
    }

    pub fn origin(&self) -> HexCoord {
        self.origin
    }

    pub fn contains(&self, hex: HexCoord) -> bool {
        self.costs.contains_key(&hex)
    }

    pub fn cost_to(&self, hex: HexCoord) -> Option<u32> {
        self.costs.get(&hex).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.costs.keys().copied()
    }

    /// Cells in painter order, for deterministic iteration
    pub fn sorted(&self) -> Vec<HexCoord> {
        let mut cells: Vec<HexCoord> = self.iter().collect();
        cells.sort_by_key(|c| (c.r, c.q));
        cells
    }

    /// Path from origin to `dest` (both inclusive), if reachable
    pub fn path_to(&self, dest: HexCoord) -> Option<Vec<HexCoord>> {
        if !self.contains(dest) {
            return None;
        }
        Some(reconstruct_path(&self.came_from, dest))
    }
}

/// Dijkstra flood from `origin` limited to `budget` movement points.
///
/// `cost_of` returns the cost of entering a cell (`None` = impassable).
/// `is_blocked` is never consulted for the origin, so a unit's own cell never
/// blocks its own movement. The origin is always in the result.
pub fn reachable_set<C, B>(origin: HexCoord, budget: u32, cost_of: C, is_blocked: B) -> Reachable
where
    C: Fn(HexCoord) -> Option<u32>,
    B: Fn(HexCoord) -> bool,
{
    let mut reachable = Reachable::origin_only(origin);
    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierNode {
        coord: origin,
        cost: 0,
    });

    while let Some(current) = frontier.pop() {
        if current.cost > reachable.cost_to(current.coord).unwrap_or(u32::MAX) {
            continue;
        }

        for neighbor in current.coord.neighbors() {
            let Some(step) = cost_of(neighbor) else {
                continue;
            };
            let tentative = current.cost + step;
            if tentative > budget {
                continue;
            }
            if tentative >= reachable.cost_to(neighbor).unwrap_or(u32::MAX) {
                continue;
            }
            if neighbor == origin || is_blocked(neighbor) {
                continue;
            }

            reachable.costs.insert(neighbor, tentative);
            reachable.came_from.insert(neighbor, current.coord);
            frontier.push(FrontierNode {
                coord: neighbor,
                cost: tentative,
            });
        }
    }

    reachable
}

/// Cheapest path from `start` to `goal`, giving up past `max_cost`.
///
/// The goal itself is exempt from `is_blocked`, so callers can path up to an
/// occupied cell and stop short of it.
pub fn find_path<C, B>(
    start: HexCoord,
    goal: HexCoord,
    max_cost: u32,
    cost_of: C,
    is_blocked: B,
) -> Option<Vec<HexCoord>>
where
    C: Fn(HexCoord) -> Option<u32>,
    B: Fn(HexCoord) -> bool,
{
    if start == goal {
        return Some(vec![start]);
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_scores: AHashMap<HexCoord, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    frontier.push(FrontierNode {
        coord: start,
        cost: 0,
    });

    while let Some(current) = frontier.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        if current.cost > *g_scores.get(&current.coord).unwrap_or(&u32::MAX) {
            continue;
        }

        for neighbor in current.coord.neighbors() {
            let Some(step) = cost_of(neighbor) else {
                continue;
            };
            if neighbor != goal && is_blocked(neighbor) {
                continue;
            }

            let tentative = current.cost + step;
            if tentative > max_cost {
                continue;
            }
            if tentative < *g_scores.get(&neighbor).unwrap_or(&u32::MAX) {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative);
                frontier.push(FrontierNode {
                    coord: neighbor,
                    cost: tentative,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &AHashMap<HexCoord, HexCoord>,
    mut current: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
