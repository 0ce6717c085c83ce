// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conductor ampacity step-response study.
//!
//! One run simulates one conductor for an hour after a step change in
//! weather and line load, preceded by five minutes of steady initial
//! conditions. The solver reports the thermal current limit (ampacity), the
//! core temperature and the time to overheat for every input timestamp.

mod driver;
mod handler;
mod series;

pub use driver::{AmpacityCase, AmpacityDriver, AmpacityParams};
pub use handler::{
    AmpacityHandler, AmpacityPayload, AmpacitySample, ConvectionModel, LineData,
    AMPACITY_COLUMN, CORE_TEMPERATURE_COLUMN, PRESIMULATION_SECONDS, REQUIRED_LINE_PROPERTIES,
    TIME_TO_OVERHEAT_COLUMN,
};
pub use series::{InputSeries, Measurement, WeatherConditions, STEP_SECONDS};
