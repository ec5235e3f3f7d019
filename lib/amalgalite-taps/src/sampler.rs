///
/// Running statistics for one named metric.
///
/// A `ProfileSampler` keeps only the count, the sum, the sum of squares and
/// the extremes of what it has seen, so every sample costs O(1) regardless of
/// how long a profiling session runs. Mean and standard deviation are derived
/// on demand from those sums.
///
/// The standard deviation is the population deviation:
///
/// ```text
/// mean   = sum / n
/// stddev = sqrt(sumsq / n - mean^2)
/// ```
///

use std::fmt;

use serde::Serialize;

use crate::number::Number;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSampler {
    name: String,
    n: u64,
    sum: Number,
    sumsq: Number,
    min: Option<Number>,
    max: Option<Number>,
}

/// Point-in-time view of a sampler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplerStats {
    pub name: String,
    pub n: u64,
    pub sum: Number,
    pub sumsq: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    pub mean: f64,
    pub stddev: f64,
}

impl ProfileSampler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            n: 0,
            sum: Number::ZERO,
            sumsq: Number::ZERO,
            min: None,
            max: None,
        }
    }

    pub fn sample(&mut self, value: impl Into<Number>) {
        let value = value.into();

        if self.min.is_none_or(|min| value < min) {
            self.min = Some(value);
        }
        if self.max.is_none_or(|max| value > max) {
            self.max = Some(value);
        }

        self.sum = self.sum + value;
        self.sumsq = self.sumsq + value.square();
        self.n += 1;
    }

    pub fn reset(&mut self) {
        *self = ProfileSampler::new(std::mem::take(&mut self.name));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn sum(&self) -> Number {
        self.sum
    }

    pub fn sumsq(&self) -> Number {
        self.sumsq
    }

    pub fn min(&self) -> Option<Number> {
        self.min
    }

    pub fn max(&self) -> Option<Number> {
        self.max
    }

    pub fn mean(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        self.sum.as_f64() / self.n as f64
    }

    pub fn stddev(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self.sumsq.as_f64() / self.n as f64 - mean * mean;
        // cancellation can leave a tiny negative residue; NaN stays NaN
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    pub fn to_h(&self) -> SamplerStats {
        SamplerStats {
            name: self.name.clone(),
            n: self.n,
            sum: self.sum,
            sumsq: self.sumsq,
            min: self.min,
            max: self.max,
            mean: self.mean(),
            stddev: self.stddev(),
        }
    }
}

fn optional(value: Option<Number>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// The dump line written by `dump_profile`, without the trailing newline.
impl fmt::Display for ProfileSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] => sum: {}, sumsq: {}, n: {}, mean: {:.6}, stddev: {:.6}, min: {}, max: {}",
            self.name,
            self.sum,
            self.sumsq,
            self.n,
            self.mean(),
            self.stddev(),
            optional(self.min),
            optional(self.max),
        )
    }
}
