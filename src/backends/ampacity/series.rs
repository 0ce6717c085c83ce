// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Sampling step of the input series, matching the solver's discrete step (seconds)
pub const STEP_SECONDS: i64 = 30;
/// Length of the series after the step change (seconds)
pub const DURATION_SECONDS: i64 = 3600;
/// Length of the steady lead-in before the step change (seconds)
pub const PRE_DURATION_SECONDS: i64 = 300;

/// Weather at the conductor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub ambient_temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub air_pressure: f64,
    pub rain_rate: f64,
    pub relative_humidity: f64,
    pub solar_irradiance: f64,
}

/// One row of the input series as sent to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub time: i64,
    #[serde(flatten)]
    pub weather: WeatherConditions,
    pub line_load: f64,
}

/// Time-indexed inputs, stored column-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputSeries {
    pub time: Vec<i64>,
    pub ambient_temperature: Vec<f64>,
    pub wind_speed: Vec<f64>,
    pub wind_direction: Vec<f64>,
    pub air_pressure: Vec<f64>,
    pub rain_rate: Vec<f64>,
    pub relative_humidity: Vec<f64>,
    pub solar_irradiance: Vec<f64>,
    pub line_load: Vec<f64>,
}

impl InputSeries {
    /// Step response: `initial` conditions for `-300..=0`, `changed` for `30..=3600`.
    pub fn step_response(
        initial: &WeatherConditions,
        initial_line_load: f64,
        changed: &WeatherConditions,
        changed_line_load: f64,
    ) -> Self {
        let mut series = Self::default();

        let mut time = -PRE_DURATION_SECONDS;
        while time <= 0 {
            series.push(time, initial, initial_line_load);
            time += STEP_SECONDS;
        }
        while time <= DURATION_SECONDS {
            series.push(time, changed, changed_line_load);
            time += STEP_SECONDS;
        }

        series
    }

    pub fn push(&mut self, time: i64, weather: &WeatherConditions, line_load: f64) {
        self.time.push(time);
        self.ambient_temperature.push(weather.ambient_temperature);
        self.wind_speed.push(weather.wind_speed);
        self.wind_direction.push(weather.wind_direction);
        self.air_pressure.push(weather.air_pressure);
        self.rain_rate.push(weather.rain_rate);
        self.relative_humidity.push(weather.relative_humidity);
        self.solar_irradiance.push(weather.solar_irradiance);
        self.line_load.push(line_load);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Row-wise view of the series.
    pub fn measurements(&self) -> impl Iterator<Item = Measurement> + '_ {
        (0..self.len()).map(move |i| Measurement {
            time: self.time[i],
            weather: WeatherConditions {
                ambient_temperature: self.ambient_temperature[i],
                wind_speed: self.wind_speed[i],
                wind_direction: self.wind_direction[i],
                air_pressure: self.air_pressure[i],
                rain_rate: self.rain_rate[i],
                relative_humidity: self.relative_humidity[i],
                solar_irradiance: self.solar_irradiance[i],
            },
            line_load: self.line_load[i],
        })
    }
}
