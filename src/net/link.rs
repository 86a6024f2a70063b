//! 单向链路：带宽、传播时延与出口队列

use super::id::NodeId;
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::SimTime;

#[derive(Debug)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    /// 传播时延
    pub latency: SimTime,
    pub bandwidth_bps: u64,
    /// 正在序列化的包发送完毕的时刻
    pub busy_until: SimTime,
    pub queue: Box<dyn PacketQueue>,
}

impl Link {
    /// 默认队列不设上限；场景里通常用 `Network::set_queue` 换成有限容量。
    pub fn new(from: NodeId, to: NodeId, latency: SimTime, bandwidth_bps: u64) -> Self {
        Self {
            from,
            to,
            latency,
            bandwidth_bps,
            busy_until: SimTime::ZERO,
            queue: Box::new(DropTailQueue::new(u32::MAX)),
        }
    }

    /// 线路空闲且没有排队的包：新包可以立即开始序列化。
    pub fn is_idle(&self, now: SimTime) -> bool {
        self.busy_until <= now && self.queue.is_empty()
    }

    /// 序列化 `bytes` 字节所需时间，向上取整到纳秒。带宽为 0 视为永不发完。
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        let bps = self.bandwidth_bps as u128;
        if bps == 0 {
            return SimTime::MAX;
        }
        let bit_ns = bytes as u128 * 8 * 1_000_000_000;
        let nanos = bit_ns.div_ceil(bps);
        SimTime(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
