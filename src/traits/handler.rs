use crate::errors::SampleResult;
use crate::runner::OutputTable;

/// Per-worker hooks that turn a sample into a solver request and a solver
/// output table back into a result payload.
///
/// One handler instance is created for each worker by
/// [`SimulationDriver::create_worker`](super::SimulationDriver::create_worker)
/// and moved into that worker's task.
pub trait SampleHandler: Send + Sync + 'static {
    type Sample: Send + Sync + 'static;
    type Payload: Default + Clone + Send + Sync + 'static;

    /// Build the payload shell for a sample, echoing its inputs.
    ///
    /// This must not fail; a panic here is a programming error.
    fn initialize_result(&self, sample: &Self::Sample) -> Self::Payload;

    /// Encode the sample into the bytes of the solver's request file.
    fn build_request(&self, sample: &Self::Sample) -> SampleResult<Vec<u8>>;

    /// Populate the payload from a successful run's output table.
    fn finalize_result(&self, payload: &mut Self::Payload, table: &OutputTable) -> SampleResult<()>;
}
