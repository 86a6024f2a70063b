//! 流统计的导出行（供外部归约/渲染使用）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::counters::{DropCause, DropCount, FlowCounters};
use super::recorder::{FlowId, FlowKey, FlowRecorder};

/// 单条流的导出记录；无定义的速率序列化为 `null`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowReport {
    pub flow_id: u32,
    pub src: String,
    pub dst: String,
    pub tx_packets: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub rx_bytes: u64,
    pub dropped: BTreeMap<DropCause, DropCount>,
    pub offered_load_bps: Option<f64>,
    pub throughput_bps: Option<f64>,
    pub mean_delay_s: Option<f64>,
}

impl FlowReport {
    pub fn new(id: FlowId, key: &FlowKey, c: &FlowCounters) -> Self {
        Self {
            flow_id: id.0,
            src: key.src.to_string(),
            dst: key.dst.to_string(),
            tx_packets: c.tx_packets,
            tx_bytes: c.tx_bytes,
            rx_packets: c.rx_packets,
            rx_bytes: c.rx_bytes,
            dropped: c.dropped.clone(),
            offered_load_bps: c.offered_load_bps(),
            throughput_bps: c.throughput_bps(),
            mean_delay_s: c.mean_delay_secs(),
        }
    }

    /// 按 FlowId 顺序导出全部流
    pub fn collect(recorder: &FlowRecorder) -> Vec<FlowReport> {
        recorder
            .iter()
            .map(|(id, key, c)| FlowReport::new(id, key, c))
            .collect()
    }
}
