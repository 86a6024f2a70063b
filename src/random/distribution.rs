//! 分布定义与参数校验

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 有界指数分布的最大重抽次数；超过后返回 `bound` 本身。
pub const MAX_REJECTION_RETRIES: u32 = 10_000;

/// 抽样分布。构造后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// `[min, max)` 上的均匀分布
    Uniform { min: f64, max: f64 },
    /// 指数分布，以均值（而非速率）为参数；`bound` 存在时超过它的抽样会被重抽。
    Exponential {
        mean: f64,
        #[serde(default)]
        bound: Option<f64>,
    },
}

impl Distribution {
    pub fn uniform(min: f64, max: f64) -> Result<Self, ConfigError> {
        let d = Distribution::Uniform { min, max };
        d.validate()?;
        Ok(d)
    }

    pub fn exponential(mean: f64) -> Result<Self, ConfigError> {
        let d = Distribution::Exponential { mean, bound: None };
        d.validate()?;
        Ok(d)
    }

    pub fn exponential_bounded(mean: f64, bound: f64) -> Result<Self, ConfigError> {
        let d = Distribution::Exponential {
            mean,
            bound: Some(bound),
        };
        d.validate()?;
        Ok(d)
    }

    /// 参数校验。
    ///
    /// 对有界指数分布额外要求 `bound >= mean/10`：更紧的上界会让拒绝采样的期望重抽
    /// 次数急剧增长（接受概率为 `1 - exp(-bound/mean)`）。
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Distribution::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min < 0.0 {
                    return Err(ConfigError::InvalidUniformRange { min, max });
                }
                if min >= max {
                    return Err(ConfigError::EmptyUniformRange { min, max });
                }
            }
            Distribution::Exponential { mean, bound } => {
                if !(mean > 0.0) || !mean.is_finite() {
                    return Err(ConfigError::NonPositiveMean(mean));
                }
                if let Some(bound) = bound {
                    if !(bound >= mean / 10.0) {
                        return Err(ConfigError::BoundTooTight { mean, bound });
                    }
                }
            }
        }
        Ok(())
    }

    /// 分布的理论均值（有界指数分布返回截断前的均值参数）。
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Uniform { min, max } => (min + max) / 2.0,
            Distribution::Exponential { mean, .. } => mean,
        }
    }
}
