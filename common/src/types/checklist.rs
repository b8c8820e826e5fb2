use crate::constants::QUALITY_CHECKS;
use crate::errors::FlowError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gate between `quality_check` and `ready`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityChecklist {
    checks: BTreeMap<String, bool>,
}

impl Default for QualityChecklist {
    fn default() -> Self {
        Self::new(QUALITY_CHECKS.iter().copied())
    }
}

impl QualityChecklist {
    pub fn new<'a>(checks: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            checks: checks
                .into_iter()
                .map(|check| (check.to_string(), false))
                .collect(),
        }
    }

    pub fn tick(&mut self, check: &str) -> Result<(), FlowError> {
        match self.checks.get_mut(check) {
            Some(done) => {
                *done = true;
                Ok(())
            }
            None => Err(FlowError::UnknownCheck(check.to_string())),
        }
    }

    pub fn tick_all(&mut self) {
        self.checks.values_mut().for_each(|done| *done = true);
    }

    pub fn missing(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|(_, done)| !**done)
            .map(|(check, _)| check.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.checks.values().all(|done| *done)
    }
}
