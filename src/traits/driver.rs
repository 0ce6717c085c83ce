use crate::errors::ProcessorError;
use crate::traits::SampleHandler;

/// Shape of a run as declared by the domain initializer.
///
/// Both counts start unset on every `start`; the initializer must set them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunPlan {
    num_samples: Option<usize>,
    num_workers: Option<usize>,
}

impl RunPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_num_samples(&mut self, num_samples: usize) {
        self.num_samples = Some(num_samples);
    }

    pub fn set_num_workers(&mut self, num_workers: usize) {
        self.num_workers = Some(num_workers);
    }

    pub fn num_samples(&self) -> Option<usize> {
        self.num_samples
    }

    pub fn num_workers(&self) -> Option<usize> {
        self.num_workers
    }

    /// Check the plan and return `(num_samples, num_workers)`.
    pub fn validate(&self) -> Result<(usize, usize), ProcessorError> {
        let num_samples = self.num_samples.ok_or_else(|| {
            ProcessorError::InvariantViolation("initializer did not set the number of samples".into())
        })?;
        let num_workers = self.num_workers.ok_or_else(|| {
            ProcessorError::InvariantViolation("initializer did not set the number of workers".into())
        })?;

        if num_workers == 0 {
            return Err(ProcessorError::InvariantViolation(
                "a run needs at least one worker".into(),
            ));
        }
        if num_workers > num_samples {
            return Err(ProcessorError::InvariantViolation(format!(
                "{} workers requested for {} samples",
                num_workers, num_samples
            )));
        }

        Ok((num_samples, num_workers))
    }
}

/// Domain specialization of the processing engine.
///
/// The processor owns exactly one driver and calls it under its distribution
/// lock, so implementations can keep a plain mutable sample cursor.
pub trait SimulationDriver: Send + 'static {
    /// Parameters accepted by `SimulationProcessor::start`.
    type Params: Send;
    type Handler: SampleHandler;

    /// Store the run parametrization and declare the run shape in `plan`.
    fn initialize_run(&mut self, params: Self::Params, plan: &mut RunPlan) -> Result<(), ProcessorError>;

    /// Create the hooks for worker `index` (`0..num_workers`).
    fn create_worker(&self, index: usize) -> Self::Handler;

    /// Produce the next sample, or `None` once the source is exhausted.
    fn create_sample(&mut self) -> Option<<Self::Handler as SampleHandler>::Sample>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_counts_are_invariant_violations() {
        let plan = RunPlan::new();
        assert!(matches!(plan.validate(), Err(ProcessorError::InvariantViolation(_))));

        let mut plan = RunPlan::new();
        plan.set_num_samples(3);
        assert!(matches!(plan.validate(), Err(ProcessorError::InvariantViolation(_))));

        let mut plan = RunPlan::new();
        plan.set_num_workers(3);
        assert!(matches!(plan.validate(), Err(ProcessorError::InvariantViolation(_))));
    }

    #[test]
    fn worker_count_is_bounded_by_sample_count() {
        let mut plan = RunPlan::new();
        plan.set_num_samples(2);
        plan.set_num_workers(3);
        assert!(matches!(plan.validate(), Err(ProcessorError::InvariantViolation(_))));

        plan.set_num_workers(0);
        assert!(matches!(plan.validate(), Err(ProcessorError::InvariantViolation(_))));

        plan.set_num_workers(2);
        assert_eq!(plan.validate(), Ok((2, 2)));
    }
}
