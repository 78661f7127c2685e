use crate::error::Result;
use crate::paths;
use crate::store::RecordStore;
use crate::types::TOTAL_DAYS;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    AtLeast(usize),
    Exactly(usize),
}

impl Requirement {
    pub fn is_met(self, completed: usize) -> bool {
        match self {
            Requirement::AtLeast(n) => completed >= n,
            Requirement::Exactly(n) => completed == n,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

/// Enumeration order is also announcement order.
pub static ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        id: "primeiro-passo",
        title: "Primeiro Passo",
        description: "Complete o primeiro dia",
        requirement: Requirement::AtLeast(1),
    },
    Achievement {
        id: "momentum",
        title: "Ganhando Momentum",
        description: "Complete 3 dias consecutivos",
        requirement: Requirement::AtLeast(3),
    },
    Achievement {
        id: "quase-la",
        title: "Quase Lá",
        description: "Complete 5 dias da jornada",
        requirement: Requirement::AtLeast(5),
    },
    Achievement {
        id: "mestre-do-foco",
        title: "Mestre do Foco",
        description: "Complete todos os 7 dias",
        requirement: Requirement::Exactly(TOTAL_DAYS as usize),
    },
];

// ---------------------------------------------------------------------------
// UnlockedAchievements
// ---------------------------------------------------------------------------

/// Ids already announced to the user. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockedAchievements(Vec<String>);

impl UnlockedAchievements {
    pub fn load<S: RecordStore>(store: &S) -> Result<Self> {
        Ok(store
            .get(paths::UNLOCKED_ACHIEVEMENTS_KEY)?
            .unwrap_or_default())
    }

    pub fn save<S: RecordStore>(&self, store: &S) -> Result<()> {
        store.put(paths::UNLOCKED_ACHIEVEMENTS_KEY, self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    fn push(&mut self, id: &str) {
        if !self.contains(id) {
            self.0.push(id.to_string());
        }
    }
}

impl<S: Into<String>> FromIterator<S> for UnlockedAchievements {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            set.push(&id.into());
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AchievementEvaluation {
    pub unlocked: Vec<&'static Achievement>,
    /// At most one announcement per evaluation, the first newly unlocked
    /// tier in enumeration order.
    pub newly_unlocked: Option<&'static Achievement>,
}

pub fn unlocked_for(completed: usize) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| a.requirement.is_met(completed))
        .collect()
}

/// Derive badges for `completed` days and record the first new one in
/// `seen`. A multi-tier jump surfaces one tier per call.
pub fn evaluate(completed: usize, seen: &mut UnlockedAchievements) -> AchievementEvaluation {
    let unlocked = unlocked_for(completed);
    let newly_unlocked = unlocked.iter().copied().find(|a| !seen.contains(a.id));
    if let Some(a) = newly_unlocked {
        tracing::info!(achievement = a.id, completed, "achievement unlocked");
        seen.push(a.id);
    }
    AchievementEvaluation {
        unlocked,
        newly_unlocked,
    }
}

/// Load the seen set, evaluate, and persist the set if it grew.
pub fn evaluate_and_record<S: RecordStore>(
    store: &S,
    completed: usize,
) -> Result<AchievementEvaluation> {
    let mut seen = UnlockedAchievements::load(store)?;
    let eval = evaluate(completed, &mut seen);
    if eval.newly_unlocked.is_some() {
        seen.save(store)?;
    }
    Ok(eval)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ids(v: &[&Achievement]) -> Vec<&'static str> {
        v.iter().map(|a| a.id).collect()
    }

    #[test]
    fn tiers_by_count() {
        assert!(unlocked_for(0).is_empty());
        assert_eq!(ids(&unlocked_for(1)), ["primeiro-passo"]);
        assert_eq!(ids(&unlocked_for(4)), ["primeiro-passo", "momentum"]);
        assert_eq!(
            ids(&unlocked_for(7)),
            ["primeiro-passo", "momentum", "quase-la", "mestre-do-foco"]
        );
    }

    #[test]
    fn master_badge_is_exact() {
        assert!(!Requirement::Exactly(7).is_met(6));
        assert!(Requirement::Exactly(7).is_met(7));
        assert!(!Requirement::Exactly(7).is_met(8));
    }

    #[test]
    fn staged_progress_announces_each_tier_once_in_order() {
        let mut seen = UnlockedAchievements::default();
        let mut announced = Vec::new();
        for count in [0, 1, 3, 5, 7] {
            if let Some(a) = evaluate(count, &mut seen).newly_unlocked {
                announced.push(a.id);
            }
        }
        assert_eq!(
            announced,
            ["primeiro-passo", "momentum", "quase-la", "mestre-do-foco"]
        );
    }

    #[test]
    fn reevaluation_never_reannounces() {
        let mut seen = UnlockedAchievements::default();
        assert!(evaluate(1, &mut seen).newly_unlocked.is_some());
        let before = seen.clone();
        assert!(evaluate(1, &mut seen).newly_unlocked.is_none());
        assert_eq!(seen, before);
    }

    #[test]
    fn jump_reveals_one_tier_per_call() {
        let mut seen = UnlockedAchievements::default();
        let first = evaluate(7, &mut seen).newly_unlocked.unwrap();
        assert_eq!(first.id, "primeiro-passo");
        assert_eq!(seen.ids().len(), 1);
        let second = evaluate(7, &mut seen).newly_unlocked.unwrap();
        assert_eq!(second.id, "momentum");
        evaluate(7, &mut seen);
        evaluate(7, &mut seen);
        assert!(evaluate(7, &mut seen).newly_unlocked.is_none());
        assert_eq!(seen.ids().len(), 4);
    }

    #[test]
    fn seen_set_only_grows_even_if_count_drops() {
        let mut seen: UnlockedAchievements = ["primeiro-passo", "momentum"].into_iter().collect();
        let eval = evaluate(0, &mut seen);
        assert!(eval.newly_unlocked.is_none());
        assert_eq!(seen.ids(), ["primeiro-passo", "momentum"]);
    }

    #[test]
    fn evaluate_and_record_persists() {
        let store = MemoryStore::new();
        evaluate_and_record(&store, 1).unwrap();
        let raw = store.get_raw(paths::UNLOCKED_ACHIEVEMENTS_KEY).unwrap().unwrap();
        let ids: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(ids, ["primeiro-passo"]);
        assert!(evaluate_and_record(&store, 1).unwrap().newly_unlocked.is_none());
    }
}
