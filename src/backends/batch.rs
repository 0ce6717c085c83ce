// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;

use crate::errors::ProcessorError;
use crate::traits::{RunPlan, SampleHandler, SimulationDriver};

/// Run parameters for [`BatchDriver`].
#[derive(Debug, Clone)]
pub struct BatchParams<S> {
    pub samples: Vec<S>,
    /// Requested worker count; capped at the number of samples.
    pub num_workers: usize,
}

impl<S> BatchParams<S> {
    pub fn new(samples: Vec<S>, num_workers: usize) -> Self {
        Self {
            samples,
            num_workers,
        }
    }
}

/// Serves a prepared list of samples in order, one handler clone per worker.
pub struct BatchDriver<H: SampleHandler + Clone> {
    handler: H,
    pending: VecDeque<H::Sample>,
}

impl<H: SampleHandler + Clone> BatchDriver<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            pending: VecDeque::new(),
        }
    }

    /// Samples not yet handed out in the current run.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl<H: SampleHandler + Clone> SimulationDriver for BatchDriver<H> {
    type Params = BatchParams<H::Sample>;
    type Handler = H;

    fn initialize_run(&mut self, params: Self::Params, plan: &mut RunPlan) -> Result<(), ProcessorError> {
        let num_samples = params.samples.len();
        plan.set_num_samples(num_samples);
        plan.set_num_workers(num_samples.min(params.num_workers));
        self.pending = params.samples.into();
        Ok(())
    }

    fn create_worker(&self, _index: usize) -> H {
        self.handler.clone()
    }

    fn create_sample(&mut self) -> Option<H::Sample> {
        self.pending.pop_front()
    }
}
