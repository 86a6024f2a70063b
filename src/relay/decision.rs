//! 偏置硬币：两路选择策略

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_RELAY_BIAS: f64 = 0.7;

/// 出口选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Egress {
    /// 发往预先 connect 的固定下游
    Primary,
    /// 回送给原发送方地址
    Secondary,
}

/// 选择 Primary 的概率，构造时校验为开区间 (0, 1)。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelayBias(f64);

impl RelayBias {
    pub fn new(p: f64) -> Result<Self, ConfigError> {
        if p > 0.0 && p < 1.0 {
            Ok(Self(p))
        } else {
            Err(ConfigError::BiasOutOfRange(p))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for RelayBias {
    fn default() -> Self {
        Self(DEFAULT_RELAY_BIAS)
    }
}

/// 无记忆的逐包决策；唯一的状态是它自己的生成器。
#[derive(Debug, Clone)]
pub struct RelayDecision {
    rng: ChaCha8Rng,
}

impl RelayDecision {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 抽一个 `(0, 1]` 上的均匀数，`draw <= bias` 时选 Primary。
    ///
    /// 接受闭区间 `[0, 1]`：`bias = 1` 恒为 Primary，`bias = 0` 恒为 Secondary。
    pub fn decide(&mut self, bias: f64) -> Egress {
        let draw = 1.0 - self.rng.r#gen::<f64>();
        if draw <= bias {
            Egress::Primary
        } else {
            Egress::Secondary
        }
    }
}
