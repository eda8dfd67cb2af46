//! Comparison across the refrigerant list.
//!
//! Each refrigerant is evaluated on its own; one that fails is recorded
//! as a [`FleetFailure`] and the rest continue.

use crate::config::CycleConfig;
use crate::cycle::{self, CycleResult};
use crate::error::CycleError;
use crate::oracle::{PropertyOracle, Refrigerant};

/// A refrigerant whose evaluation did not complete.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetFailure {
    pub refrigerant: Refrigerant,
    pub error: CycleError,
}

/// Successful results in evaluation order, plus the failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetResults {
    entries: Vec<(Refrigerant, CycleResult)>,
    failures: Vec<FleetFailure>,
}

impl FleetResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one evaluation outcome into the collection.
    pub fn record(mut self, outcome: Result<CycleResult, CycleError>) -> Self {
        match outcome {
            Ok(result) => self.entries.push((result.refrigerant, result)),
            Err(error) => self.failures.push(FleetFailure {
                refrigerant: error.refrigerant(),
                error,
            }),
        }
        self
    }

    /// `(refrigerant, result)` pairs in insertion order.
    pub fn entries(&self) -> &[(Refrigerant, CycleResult)] {
        &self.entries
    }

    pub fn results(&self) -> impl Iterator<Item = &CycleResult> {
        self.entries.iter().map(|(_, r)| r)
    }

    pub fn failures(&self) -> &[FleetFailure] {
        &self.failures
    }

    /// Result for `refrigerant`, if it succeeded.
    pub fn get(&self, refrigerant: Refrigerant) -> Option<&CycleResult> {
        self.entries
            .iter()
            .find(|(r, _)| *r == refrigerant)
            .map(|(_, result)| result)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Evaluate every refrigerant in `config.refrigerants`, in order.
///
/// `on_each` sees every outcome as soon as it is available, so callers
/// can print a section before the next refrigerant starts.
pub fn evaluate_fleet<O, F>(config: &CycleConfig, oracle: &O, mut on_each: F) -> FleetResults
where
    O: PropertyOracle + ?Sized,
    F: FnMut(&Result<CycleResult, CycleError>),
{
    config
        .refrigerants
        .iter()
        .fold(FleetResults::new(), |fleet, &refrigerant| {
            let inputs = config.inputs_for(refrigerant);
            let outcome = cycle::evaluate(&inputs, config, oracle);
            on_each(&outcome);
            fleet.record(outcome)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    fn domain_error(refrigerant: Refrigerant) -> CycleError {
        CycleError::Domain {
            refrigerant,
            stage: Stage::EnergyBalance,
            detail: "compressor work 0 J/kg".into(),
        }
    }

    #[test]
    fn failures_are_kept_apart() {
        let fleet = FleetResults::new()
            .record(Err(domain_error(Refrigerant::R32)))
            .record(Err(domain_error(Refrigerant::R744)));
        assert!(fleet.is_empty());
        assert_eq!(fleet.failures().len(), 2);
        assert_eq!(fleet.failures()[0].refrigerant, Refrigerant::R32);
        assert_eq!(fleet.failures()[1].refrigerant, Refrigerant::R744);
        assert!(fleet.get(Refrigerant::R32).is_none());
    }
}
