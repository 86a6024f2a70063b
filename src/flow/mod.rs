//! 流统计
//!
//! 按流（源地址, 目的地址）累计发送/接收/丢弃计数，运行结束后查询。

mod counters;
mod recorder;
mod report;

pub use counters::{DropCause, DropCount, FlowCounters};
pub use recorder::{FlowId, FlowKey, FlowRecorder};
pub use report::FlowReport;
