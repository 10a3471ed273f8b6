use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;
/// Level assumed for an area the user did not rate.
pub const DEFAULT_LEVEL: u8 = 3;

/// Areas the user rates their own proficiency in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LearningArea {
    Python,
    GenerativeAi,
    BiTools,
    AutomationTools,
    DigitalMarketing,
    DataAnalysis,
}

impl LearningArea {
    pub const ALL: [LearningArea; 6] = [
        LearningArea::Python,
        LearningArea::GenerativeAi,
        LearningArea::BiTools,
        LearningArea::AutomationTools,
        LearningArea::DigitalMarketing,
        LearningArea::DataAnalysis,
    ];
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LevelRecord {
    levels: BTreeMap<LearningArea, u8>,
    recorded_at: DateTime<Utc>,
}

impl LevelRecord {
    pub fn levels(&self) -> &BTreeMap<LearningArea, u8> {
        &self.levels
    }

    pub fn level(&self, area: LearningArea) -> u8 {
        self.levels.get(&area).copied().unwrap_or(DEFAULT_LEVEL)
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Append-only history of self-assessed levels.
#[derive(Debug, Default)]
pub struct LevelLog {
    records: Vec<LevelRecord>,
}

impl LevelLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a full rating of every [`LearningArea`].
    ///
    /// Areas missing from `levels` are recorded at [`DEFAULT_LEVEL`]; levels are clamped to
    /// [`MIN_LEVEL`]..=[`MAX_LEVEL`].
    pub fn record(&mut self, levels: &BTreeMap<LearningArea, u8>) -> &LevelRecord {
        let levels = LearningArea::ALL
            .iter()
            .map(|area| {
                let level = levels
                    .get(area)
                    .copied()
                    .unwrap_or(DEFAULT_LEVEL)
                    .clamp(MIN_LEVEL, MAX_LEVEL);

                (*area, level)
            })
            .collect();

        self.records.push(LevelRecord {
            levels,
            recorded_at: Utc::now(),
        });

        &self.records[self.records.len() - 1]
    }

    pub fn latest(&self) -> Option<&LevelRecord> {
        self.records.last()
    }

    /// Records, oldest first.
    pub fn history(&self) -> &[LevelRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrated_areas_get_the_default_level() {
        let mut log = LevelLog::new();

        let record = log.record(&BTreeMap::from([(LearningArea::Python, 5)]));

        assert_eq!(record.levels().len(), LearningArea::ALL.len());
        assert_eq!(record.level(LearningArea::Python), 5);
        assert_eq!(record.level(LearningArea::DataAnalysis), DEFAULT_LEVEL);
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        let mut log = LevelLog::new();

        let record = log.record(&BTreeMap::from([
            (LearningArea::BiTools, 0),
            (LearningArea::GenerativeAi, 9),
        ]));

        assert_eq!(record.level(LearningArea::BiTools), MIN_LEVEL);
        assert_eq!(record.level(LearningArea::GenerativeAi), MAX_LEVEL);
    }

    #[test]
    fn latest_is_the_last_recorded() {
        let mut log = LevelLog::new();
        assert!(log.latest().is_none());

        log.record(&BTreeMap::from([(LearningArea::Python, 1)]));
        log.record(&BTreeMap::from([(LearningArea::Python, 2)]));

        assert_eq!(log.history().len(), 2);
        assert_eq!(log.latest().unwrap().level(LearningArea::Python), 2);
    }
}
