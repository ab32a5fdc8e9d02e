//! End-of-encounter callback

use serde::{Deserialize, Serialize};

/// What the host learns when an encounter ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub victory: bool,
    pub surrender: bool,
    pub chapter: u32,
    pub stage: u32,
    /// Zero unless `victory`
    pub reward_gold: u32,
}

/// Receives the encounter result exactly once
pub trait BattleHost {
    fn on_battle_end(&mut self, result: &BattleResult);
}

impl<F> BattleHost for F
where
    F: FnMut(&BattleResult),
{
    fn on_battle_end(&mut self, result: &BattleResult) {
        self(result)
    }
}

/// Keeps every result it is handed
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub results: Vec<BattleResult>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&BattleResult> {
        self.results.last()
    }
}

impl BattleHost for RecordingHost {
    fn on_battle_end(&mut self, result: &BattleResult) {
        self.results.push(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> BattleResult {
        BattleResult {
            victory: true,
            surrender: false,
            chapter: 1,
            stage: 2,
            reward_gold: 50,
        }
    }

    #[test]
    fn test_closure_host() {
        let mut seen = 0;
        {
            let mut host = |r: &BattleResult| {
                assert!(r.victory);
                seen += 1;
            };
            host.on_battle_end(&result());
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_recording_host() {
        let mut host = RecordingHost::new();
        host.on_battle_end(&result());
        assert_eq!(host.results.len(), 1);
        assert_eq!(host.last().map(|r| r.reward_gold), Some(50));
    }
}
