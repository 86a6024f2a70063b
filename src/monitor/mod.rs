//! 队列占用采样
//!
//! 按固定的虚拟时间间隔读取被监控队列的深度，追加到只增日志；与流量无关。

mod sampler;
mod trace;

pub use sampler::{QueueProbe, QueueSample, QueueSampler, SampleQueues, SamplerId};
pub use trace::QueueTraceWriter;
