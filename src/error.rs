//! 错误类型
//!
//! 配置错误在建立仿真时（调度任何事件之前）返回；传输错误只在发送路径上出现，
//! 由网络记录为丢包，不会向上传播中断仿真。

use thiserror::Error;

use crate::net::Address;

/// 配置错误：参数范围不合法。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("exponential mean must be > 0, got {0}")]
    NonPositiveMean(f64),
    #[error("uniform range requires min < max, got [{min}, {max})")]
    EmptyUniformRange { min: f64, max: f64 },
    #[error("uniform range must be non-negative and finite, got [{min}, {max})")]
    InvalidUniformRange { min: f64, max: f64 },
    #[error("exponential bound {bound} is incompatible with mean {mean} (need bound >= mean/10)")]
    BoundTooTight { mean: f64, bound: f64 },
    #[error("relay bias must be in (0, 1), got {0}")]
    BiasOutOfRange(f64),
    #[error("horizon is empty: [{start}, {end})")]
    EmptyHorizon { start: f64, end: f64 },
    #[error("sampling period must be > 0, got {0}")]
    NonPositivePeriod(f64),
    #[error("queue capacity must be > 0 packets")]
    ZeroQueueCapacity,
    #[error("{name} = {value} is past the stop time {stop}")]
    PastStop {
        name: &'static str,
        value: f64,
        stop: f64,
    },
    #[error("time {name} must be finite and >= 0, got {value}")]
    InvalidTime { name: &'static str, value: f64 },
    #[error("scenario has no traffic sources")]
    NoSources,
    #[error("unknown host `{0}`")]
    UnknownHost(String),
}

/// 发送失败的原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("socket {0} does not exist")]
    UnknownSocket(usize),
    #[error("socket {0} is not connected")]
    NotConnected(usize),
    #[error("no route from node {from} to {dst}")]
    NoRoute { from: usize, dst: Address },
}
