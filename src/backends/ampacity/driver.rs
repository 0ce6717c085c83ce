// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;

use crate::backends::ampacity::handler::{AmpacityHandler, AmpacitySample, LineData};
use crate::backends::ampacity::series::{InputSeries, WeatherConditions};
use crate::errors::ProcessorError;
use crate::traits::{RunPlan, SimulationDriver};

/// A conductor and the weather/load step it is exposed to.
///
/// This is the case file format read by the `sim-dispatch` binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AmpacityCase {
    pub conductor_type: String,
    pub line_data: LineData,
    pub initial_weather: WeatherConditions,
    pub initial_line_load: f64,
    pub changed_weather: WeatherConditions,
    pub changed_line_load: f64,
}

#[derive(Debug, Clone)]
pub struct AmpacityParams {
    pub case: AmpacityCase,
    pub num_workers: usize,
}

/// Step-response ampacity study: exactly one sample per run.
#[derive(Debug, Default)]
pub struct AmpacityDriver {
    case: Option<AmpacityCase>,
    generated: usize,
}

impl AmpacityDriver {
    pub const NUM_SAMPLES: usize = 1;

    pub fn new() -> Self {
        Self::default()
    }
}

impl SimulationDriver for AmpacityDriver {
    type Params = AmpacityParams;
    type Handler = AmpacityHandler;

    fn initialize_run(&mut self, params: AmpacityParams, plan: &mut RunPlan) -> Result<(), ProcessorError> {
        let missing = params.case.line_data.missing_properties();
        if !missing.is_empty() {
            return Err(ProcessorError::Initialization(format!(
                "line data for '{}' is missing {}",
                params.case.conductor_type,
                missing.join(", ")
            )));
        }

        plan.set_num_samples(Self::NUM_SAMPLES);
        plan.set_num_workers(Self::NUM_SAMPLES.min(params.num_workers));

        self.case = Some(params.case);
        self.generated = 0;
        Ok(())
    }

    fn create_worker(&self, _index: usize) -> AmpacityHandler {
        AmpacityHandler
    }

    fn create_sample(&mut self) -> Option<AmpacitySample> {
        if self.generated >= Self::NUM_SAMPLES {
            return None;
        }
        let case = self.case.as_ref()?;
        self.generated += 1;

        // The series is built here, under the distribution lock; there is only one.
        Some(AmpacitySample {
            conductor_type: case.conductor_type.clone(),
            line_data: case.line_data.clone(),
            series: InputSeries::step_response(
                &case.initial_weather,
                case.initial_line_load,
                &case.changed_weather,
                case.changed_line_load,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ampacity::handler::tests::complete_line_data;

    fn case() -> AmpacityCase {
        AmpacityCase {
            conductor_type: "ACSR 265-AL1/35-ST1A".to_string(),
            line_data: complete_line_data(),
            initial_weather: WeatherConditions {
                ambient_temperature: 15.0,
                ..WeatherConditions::default()
            },
            initial_line_load: 300.0,
            changed_weather: WeatherConditions {
                ambient_temperature: 30.0,
                ..WeatherConditions::default()
            },
            changed_line_load: 650.0,
        }
    }

    #[test]
    fn run_has_one_sample_and_at_most_one_worker() {
        let mut driver = AmpacityDriver::new();
        let mut plan = RunPlan::new();
        driver
            .initialize_run(AmpacityParams { case: case(), num_workers: 8 }, &mut plan)
            .unwrap();
        assert_eq!(plan.validate(), Ok((1, 1)));
    }

    #[test]
    fn zero_requested_workers_is_an_invalid_plan() {
        let mut driver = AmpacityDriver::new();
        let mut plan = RunPlan::new();
        driver
            .initialize_run(AmpacityParams { case: case(), num_workers: 0 }, &mut plan)
            .unwrap();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn single_sample_then_exhausted_until_next_run() {
        let mut driver = AmpacityDriver::new();
        assert!(driver.create_sample().is_none());

        let mut plan = RunPlan::new();
        driver
            .initialize_run(AmpacityParams { case: case(), num_workers: 1 }, &mut plan)
            .unwrap();

        let sample = driver.create_sample().unwrap();
        assert_eq!(sample.series.len(), 131);
        assert_eq!(sample.series.line_load.last(), Some(&650.0));
        assert!(driver.create_sample().is_none());

        driver
            .initialize_run(AmpacityParams { case: case(), num_workers: 1 }, &mut plan)
            .unwrap();
        assert!(driver.create_sample().is_some());
    }

    #[test]
    fn incomplete_line_data_is_rejected_before_planning() {
        let mut incomplete = case();
        incomplete.line_data.properties.remove("emissivity");
        incomplete.line_data.properties.remove("nusselt_exp_3");

        let mut driver = AmpacityDriver::new();
        let mut plan = RunPlan::new();
        let error = driver
            .initialize_run(AmpacityParams { case: incomplete, num_workers: 1 }, &mut plan)
            .unwrap_err();

        match error {
            ProcessorError::Initialization(message) => {
                assert!(message.contains("emissivity"), "{}", message);
                assert!(message.contains("nusselt_exp_3"), "{}", message);
            }
            other => panic!("expected Initialization, got {:?}", other),
        }
        assert_eq!(plan, RunPlan::new());
        assert!(driver.create_sample().is_none());
    }

    #[tokio::test]
    async fn processor_stays_idle_when_the_case_is_rejected() {
        use crate::engine::{ProcessorOptions, SimulationProcessor};
        use crate::runner::{ExternalRunner, RunnerConfig};

        let processor = SimulationProcessor::new(
            AmpacityDriver::new(),
            ExternalRunner::new(RunnerConfig::new("/bin/true")),
            ProcessorOptions::default(),
        );
        let mut incomplete = case();
        incomplete.line_data.properties.clear();

        let result = processor
            .start(AmpacityParams { case: incomplete, num_workers: 1 })
            .await;

        assert!(matches!(result, Err(ProcessorError::Initialization(_))));
        assert!(!processor.is_active());
        assert!(processor.results().await.is_empty());
    }

    #[test]
    fn case_file_parses_from_json() {
        let json = r#"{
            "conductor_type": "ACSR 265-AL1/35-ST1A",
            "line_data": {"emissivity": 0.8},
            "initial_weather": {"ambient_temperature": 15, "wind_speed": 0.6, "wind_direction": 45,
                                "air_pressure": 1013, "rain_rate": 0, "relative_humidity": 0.6,
                                "solar_irradiance": 0},
            "initial_line_load": 300,
            "changed_weather": {"ambient_temperature": 30, "wind_speed": 0.6, "wind_direction": 45,
                                "air_pressure": 1013, "rain_rate": 0, "relative_humidity": 0.6,
                                "solar_irradiance": 900},
            "changed_line_load": 650
        }"#;

        let case: AmpacityCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.changed_weather.solar_irradiance, 900.0);
        assert_eq!(case.line_data.properties.get("emissivity"), Some(&0.8));
    }

    #[test]
    fn shipped_case_has_every_required_property() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/cases/step-response.json");
        let case: AmpacityCase = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert!(case.line_data.missing_properties().is_empty());
    }
}
