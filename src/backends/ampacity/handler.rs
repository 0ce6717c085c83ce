// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::backends::ampacity::series::{InputSeries, Measurement};
use crate::errors::{SampleError, SampleResult};
use crate::runner::OutputTable;
use crate::traits::SampleHandler;

/// Solver warm-up before the first measurement (seconds)
pub const PRESIMULATION_SECONDS: u32 = 7200;
/// Time step of the solver's implicit integration (seconds)
pub const DISCRETE_TIME_STEP_SECONDS: u32 = 10;

pub const AMPACITY_COLUMN: &str = " I_th [A]";
pub const CORE_TEMPERATURE_COLUMN: &str = " T_core [deg C]";
pub const TIME_TO_OVERHEAT_COLUMN: &str = " time_to_overheat [s]";

/// Conductor properties the solver cannot run without.
pub const REQUIRED_LINE_PROPERTIES: &[&str] = &[
    "inner_part_specific_weight",
    "inner_part_specific_heat",
    "inner_part_specific_heat_coefficient",
    "inner_part_resistivity_coefficient",
    "inner_part_specific_conductivity",
    "inner_part_cross_section",
    "inner_part_diameter",
    "outer_part_specific_weight",
    "outer_part_specific_heat",
    "outer_part_specific_heat_coefficient",
    "outer_part_resistivity_coefficient",
    "outer_part_specific_conductivity",
    "outer_part_cross_section",
    "outer_part_diameter",
    "outer_part_number_of_wires",
    "outer_part_diameter_of_wire",
    "line_altitude",
    "line_orientation",
    "effective_radial_thermal_conductivity",
    "wetted_factor",
    "impinging_factor",
    "recovery_factor",
    "skin_effect_factor",
    "emissivity",
    "absorptivity",
    "rough_surface_correction",
    "critical_temperature",
    "nusselt_base_1",
    "nusselt_base_2",
    "nusselt_base_3",
    "nusselt_exp_1",
    "nusselt_exp_2",
    "nusselt_exp_3",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvectionModel {
    #[default]
    Cigre,
    Ieee,
}

/// Named numeric conductor properties plus the convection model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineData {
    #[serde(default)]
    pub convection_model: ConvectionModel,
    #[serde(flatten)]
    pub properties: BTreeMap<String, f64>,
}

impl LineData {
    pub fn missing_properties(&self) -> Vec<&'static str> {
        REQUIRED_LINE_PROPERTIES
            .iter()
            .copied()
            .filter(|key| !self.properties.contains_key(*key))
            .collect()
    }
}

/// The single unit of work of an ampacity case.
#[derive(Debug, Clone, PartialEq)]
pub struct AmpacitySample {
    pub conductor_type: String,
    pub line_data: LineData,
    pub series: InputSeries,
}

/// Echoed inputs plus the computed output series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AmpacityPayload {
    #[serde(flatten)]
    pub inputs: InputSeries,
    pub ampacity: Vec<f64>,
    pub conductor_core_temperature: Vec<f64>,
    pub time_to_overheat: Vec<f64>,
}

#[derive(Serialize)]
struct SimulationRequest<'a> {
    conductor_type: &'a str,
    line_data: &'a LineData,
    presimulation_time: u32,
    discrete_time_step: u32,
    measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AmpacityHandler;

impl SampleHandler for AmpacityHandler {
    type Sample = AmpacitySample;
    type Payload = AmpacityPayload;

    fn initialize_result(&self, sample: &AmpacitySample) -> AmpacityPayload {
        AmpacityPayload {
            inputs: sample.series.clone(),
            ..AmpacityPayload::default()
        }
    }

    fn build_request(&self, sample: &AmpacitySample) -> SampleResult<Vec<u8>> {
        let missing = sample.line_data.missing_properties();
        if !missing.is_empty() {
            return Err(SampleError::Request(format!(
                "line data lacks {}",
                missing.join(", ")
            )));
        }
        if sample.series.is_empty() {
            return Err(SampleError::Request("empty input series".to_string()));
        }

        let request = SimulationRequest {
            conductor_type: &sample.conductor_type,
            line_data: &sample.line_data,
            presimulation_time: PRESIMULATION_SECONDS,
            discrete_time_step: DISCRETE_TIME_STEP_SECONDS,
            measurements: sample.series.measurements().collect(),
        };
        Ok(serde_json::to_vec_pretty(&request)?)
    }

    fn finalize_result(&self, payload: &mut AmpacityPayload, table: &OutputTable) -> SampleResult<()> {
        payload.ampacity = table.column(AMPACITY_COLUMN)?;
        payload.conductor_core_temperature = table.column(CORE_TEMPERATURE_COLUMN)?;
        payload.time_to_overheat = table.column(TIME_TO_OVERHEAT_COLUMN)?;
        Ok(())
    }
}
