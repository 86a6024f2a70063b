//! 流记录器
//!
//! 由网络在发送/接收/丢弃时同步调用。每个新出现的 (src, dst) 按首次出现顺序
//! 分配一个从 1 开始的 [`FlowId`]。

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::counters::{DropCause, FlowCounters};
use crate::net::Address;
use crate::sim::SimTime;

/// 流的键：有向的（源地址, 目的地址）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowKey {
    pub src: Address,
    pub dst: Address,
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowId(pub u32);

#[derive(Debug, Default)]
pub struct FlowRecorder {
    ids: HashMap<FlowKey, FlowId>,
    flows: Vec<(FlowKey, FlowCounters)>,
}

impl FlowRecorder {
    fn entry(&mut self, key: FlowKey) -> &mut FlowCounters {
        let idx = match self.ids.get(&key) {
            Some(id) => id.0 as usize - 1,
            None => {
                let id = FlowId(self.flows.len() as u32 + 1);
                trace!(flow_id = id.0, flow = %key, "新流");
                self.ids.insert(key, id);
                self.flows.push((key, FlowCounters::default()));
                self.flows.len() - 1
            }
        };
        &mut self.flows[idx].1
    }

    pub fn on_send(&mut self, key: FlowKey, bytes: u32, now: SimTime) {
        self.entry(key).record_tx(bytes, now);
    }

    /// `delay` 为该包从首次发送到送达的时间
    pub fn on_receive(&mut self, key: FlowKey, bytes: u32, delay: SimTime, now: SimTime) {
        self.entry(key).record_rx(bytes, delay, now);
    }

    pub fn on_drop(&mut self, key: FlowKey, bytes: u32, cause: DropCause, now: SimTime) {
        trace!(flow = %key, bytes, ?cause, ?now, "记录丢包");
        self.entry(key).record_drop(bytes, cause);
    }

    pub fn flow_id(&self, key: &FlowKey) -> Option<FlowId> {
        self.ids.get(key).copied()
    }

    pub fn summary(&self, key: &FlowKey) -> Option<&FlowCounters> {
        let id = self.ids.get(key)?;
        self.flows.get(id.0 as usize - 1).map(|(_, c)| c)
    }

    /// 按 FlowId 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (FlowId, &FlowKey, &FlowCounters)> {
        self.flows
            .iter()
            .enumerate()
            .map(|(i, (k, c))| (FlowId(i as u32 + 1), k, c))
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// 所有流的发送字节总数
    pub fn total_tx_bytes(&self) -> u64 {
        self.flows.iter().map(|(_, c)| c.tx_bytes).sum()
    }
}
