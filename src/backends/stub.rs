// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProcessorError, SampleError, SampleResult};
use crate::runner::OutputTable;
use crate::traits::{RunPlan, SampleHandler, SimulationDriver};

/// A sample whose request body is given verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct StubSample {
    pub id: usize,
    pub request: String,
}

impl StubSample {
    pub fn new(id: usize, request: impl Into<String>) -> Self {
        Self {
            id,
            request: request.into(),
        }
    }
}

/// Records the sample id and the first value of one output column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StubPayload {
    pub id: usize,
    pub value: Option<f64>,
}

/// Handler that writes the sample's request text and reads back one column
#[derive(Debug, Clone)]
pub struct StubHandler {
    column: String,
}

impl StubHandler {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl SampleHandler for StubHandler {
    type Sample = StubSample;
    type Payload = StubPayload;

    fn initialize_result(&self, sample: &StubSample) -> StubPayload {
        StubPayload {
            id: sample.id,
            value: None,
        }
    }

    fn build_request(&self, sample: &StubSample) -> SampleResult<Vec<u8>> {
        if sample.request.is_empty() {
            return Err(SampleError::Request(format!("sample {} has no request", sample.id)));
        }
        Ok(sample.request.clone().into_bytes())
    }

    fn finalize_result(&self, payload: &mut StubPayload, table: &OutputTable) -> SampleResult<()> {
        payload.value = table.column(&self.column)?.first().copied();
        Ok(())
    }
}

/// Driver that serves a fixed list of samples and counts how often it was asked
pub struct StubDriver {
    column: String,
    samples: Vec<StubSample>,
    cursor: usize,
    pub requests: Arc<AtomicUsize>,
}

/// Run parameters for [`StubDriver`]: samples and worker count are taken
/// verbatim so tests can also declare inconsistent plans.
pub struct StubParams {
    pub samples: Vec<StubSample>,
    pub num_samples: Option<usize>,
    pub num_workers: Option<usize>,
}

impl StubParams {
    pub fn new(samples: Vec<StubSample>, num_workers: usize) -> Self {
        Self {
            num_samples: Some(samples.len()),
            num_workers: Some(num_workers),
            samples,
        }
    }
}

impl StubDriver {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            samples: Vec::new(),
            cursor: 0,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl SimulationDriver for StubDriver {
    type Params = StubParams;
    type Handler = StubHandler;

    fn initialize_run(&mut self, params: StubParams, plan: &mut RunPlan) -> Result<(), ProcessorError> {
        self.samples = params.samples;
        self.cursor = 0;
        if let Some(n) = params.num_samples {
            plan.set_num_samples(n);
        }
        if let Some(n) = params.num_workers {
            plan.set_num_workers(n);
        }
        Ok(())
    }

    fn create_worker(&self, _index: usize) -> StubHandler {
        StubHandler::new(self.column.clone())
    }

    fn create_sample(&mut self) -> Option<StubSample> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let sample = self.samples.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(sample)
    }
}
