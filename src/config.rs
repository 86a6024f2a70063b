//! 场景配置
//!
//! 可从 JSON 文件读取（serde）。缺省场景：四个指数流量源、
//! 网关到服务器的队列 10000 包、中继偏置 0.7、仿真 11 秒、每 1 ms 采样一次。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::Distribution;
use crate::relay::{DEFAULT_RELAY_BIAS, RelayBias};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// 主种子：每个随机过程的种子都由它派生
    pub seed: u64,
    /// 停止时间（秒），之后的事件不执行
    pub stop_s: f64,
    /// 网关与中继服务器之间链路的队列容量（包）
    pub queue_pkts: u32,
    /// 其余链路的设备队列容量（包）
    pub device_queue_pkts: u32,
    pub relay: RelayConfig,
    pub sampling: SamplingConfig,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub bias: f64,
    pub port: u16,
    /// 中继开始转发的时间（秒）
    pub start_s: f64,
    /// 中继停止转发的时间（秒）
    pub stop_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub period_s: f64,
    pub start_s: f64,
    /// 缺省为场景停止时间
    pub end_s: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 流量源所在主机名（`a`/`b`/`c`/`d`）
    pub host: String,
    #[serde(default = "default_source_start")]
    pub start_s: f64,
    pub interval: Distribution,
    pub size: Distribution,
}

fn default_source_start() -> f64 {
    2.0
}

impl SourceConfig {
    /// 指数间隔 + 指数包长
    pub fn exponential(host: impl Into<String>, mean_interval_s: f64, mean_size: f64) -> Self {
        Self {
            host: host.into(),
            start_s: default_source_start(),
            interval: Distribution::Exponential {
                mean: mean_interval_s,
                bound: None,
            },
            size: Distribution::Exponential {
                mean: mean_size,
                bound: None,
            },
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bias: DEFAULT_RELAY_BIAS,
            port: 9,
            start_s: 1.0,
            stop_s: 10.0,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            period_s: 0.001,
            start_s: 1.0,
            end_s: None,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            stop_s: 11.0,
            queue_pkts: 10_000,
            device_queue_pkts: 10,
            relay: RelayConfig::default(),
            sampling: SamplingConfig::default(),
            sources: vec![
                SourceConfig::exponential("a", 0.002, 100.0),
                SourceConfig::exponential("b", 0.002, 100.0),
                SourceConfig::exponential("c", 0.0005, 100.0),
                SourceConfig::exponential("d", 0.001, 100.0),
            ],
        }
    }
}

fn check_time(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTime { name, value })
    }
}

impl ScenarioConfig {
    pub fn sampling_end_s(&self) -> f64 {
        self.sampling.end_s.unwrap_or(self.stop_s)
    }

    /// 在调度任何事件之前做完整的范围检查。
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_time("stop_s", self.stop_s)?;
        if self.stop_s <= 0.0 {
            return Err(ConfigError::EmptyHorizon {
                start: 0.0,
                end: self.stop_s,
            });
        }
        if self.queue_pkts == 0 || self.device_queue_pkts == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }

        RelayBias::new(self.relay.bias)?;
        check_time("relay.start_s", self.relay.start_s)?;
        check_time("relay.stop_s", self.relay.stop_s)?;
        if self.relay.stop_s <= self.relay.start_s {
            return Err(ConfigError::EmptyHorizon {
                start: self.relay.start_s,
                end: self.relay.stop_s,
            });
        }

        let period = self.sampling.period_s;
        if !(period > 0.0) || !period.is_finite() {
            return Err(ConfigError::NonPositivePeriod(period));
        }
        check_time("sampling.start_s", self.sampling.start_s)?;
        let end = self.sampling_end_s();
        check_time("sampling.end_s", end)?;
        if end <= self.sampling.start_s {
            return Err(ConfigError::EmptyHorizon {
                start: self.sampling.start_s,
                end,
            });
        }
        if end > self.stop_s {
            return Err(ConfigError::PastStop {
                name: "sampling.end_s",
                value: end,
                stop: self.stop_s,
            });
        }

        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for src in &self.sources {
            check_time("source.start_s", src.start_s)?;
            src.interval.validate()?;
            src.size.validate()?;
        }
        Ok(())
    }
}
