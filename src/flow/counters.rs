//! 单条流的计数器

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::SimTime;

/// 丢包原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropCause {
    /// 出口队列已满（尾丢弃）
    QueueOverflow,
    /// 转发途中找不到下一跳
    NoRoute,
    /// 套接字拒绝发送（未连接、无路由等）
    TransportRejected,
    /// 链路被拆除时仍在队列中
    LinkDown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCount {
    pub packets: u64,
    pub bytes: u64,
}

/// 单条流的累计统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowCounters {
    pub tx_packets: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub rx_bytes: u64,
    pub dropped: BTreeMap<DropCause, DropCount>,
    pub first_tx_time: Option<SimTime>,
    pub last_tx_time: Option<SimTime>,
    pub first_rx_time: Option<SimTime>,
    pub last_rx_time: Option<SimTime>,
    /// 所有已接收包的端到端时延之和
    pub delay_sum: SimTime,
}

/// `bytes*8 / (last - first)`；区间为空或缺失时无定义。
fn rate_bps(bytes: u64, first: Option<SimTime>, last: Option<SimTime>) -> Option<f64> {
    let (first, last) = (first?, last?);
    if last <= first {
        return None;
    }
    Some(bytes as f64 * 8.0 / last.saturating_sub(first).as_secs_f64())
}

impl FlowCounters {
    pub(crate) fn record_tx(&mut self, bytes: u32, now: SimTime) {
        self.tx_packets += 1;
        self.tx_bytes += bytes as u64;
        self.first_tx_time.get_or_insert(now);
        self.last_tx_time = Some(now);
    }

    pub(crate) fn record_rx(&mut self, bytes: u32, delay: SimTime, now: SimTime) {
        self.rx_packets += 1;
        self.rx_bytes += bytes as u64;
        self.delay_sum = self.delay_sum.saturating_add(delay);
        self.first_rx_time.get_or_insert(now);
        self.last_rx_time = Some(now);
    }

    pub(crate) fn record_drop(&mut self, bytes: u32, cause: DropCause) {
        let d = self.dropped.entry(cause).or_default();
        d.packets += 1;
        d.bytes += bytes as u64;
    }

    /// 某一原因的丢包计数
    pub fn dropped_by(&self, cause: DropCause) -> DropCount {
        self.dropped.get(&cause).copied().unwrap_or_default()
    }

    pub fn dropped_packets(&self) -> u64 {
        self.dropped.values().map(|d| d.packets).sum()
    }

    /// 发送端负载（bit/s）；少于两个不同时刻的发送时返回 None。
    pub fn offered_load_bps(&self) -> Option<f64> {
        rate_bps(self.tx_bytes, self.first_tx_time, self.last_tx_time)
    }

    /// 接收吞吐（bit/s）；少于两个不同时刻的接收时返回 None。
    pub fn throughput_bps(&self) -> Option<f64> {
        rate_bps(self.rx_bytes, self.first_rx_time, self.last_rx_time)
    }

    /// 平均端到端时延（秒）
    pub fn mean_delay_secs(&self) -> Option<f64> {
        if self.rx_packets == 0 {
            return None;
        }
        Some(self.delay_sum.as_secs_f64() / self.rx_packets as f64)
    }

    /// 已发送但既未收到也未记为丢弃的包（运行结束时仍在途或在队列中）
    pub fn in_flight_packets(&self) -> u64 {
        self.tx_packets
            .saturating_sub(self.rx_packets)
            .saturating_sub(self.dropped_packets())
    }
}
