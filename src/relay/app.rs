//! 中继接收应用
//!
//! 两个套接字在构造时注入：`primary` 已 connect 到固定下游，`secondary`
//! 用于按原发送方地址回送。

use std::any::Any;

use tracing::{debug, trace, warn};

use super::decision::{Egress, RelayBias, RelayDecision};
use crate::net::{Address, Application, Network, Packet, Payload, SocketId};
use crate::sim::{SimTime, Simulator};

/// 中继转发的生效时间窗 `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub start: SimTime,
    pub stop: SimTime,
}

impl ActiveWindow {
    pub const ALWAYS: ActiveWindow = ActiveWindow {
        start: SimTime::ZERO,
        stop: SimTime::MAX,
    };

    pub fn contains(&self, t: SimTime) -> bool {
        t >= self.start && t < self.stop
    }
}

#[derive(Debug)]
pub struct RelayApp {
    id: u64,
    bias: RelayBias,
    decision: RelayDecision,
    primary: SocketId,
    secondary: SocketId,
    window: ActiveWindow,
    next_seq: u64,
    pub primary_count: u64,
    pub secondary_count: u64,
    /// 时间窗外到达、未转发的包
    pub ignored: u64,
}

impl RelayApp {
    pub fn new(
        id: u64,
        bias: RelayBias,
        decision: RelayDecision,
        primary: SocketId,
        secondary: SocketId,
    ) -> Self {
        Self {
            id,
            bias,
            decision,
            primary,
            secondary,
            window: ActiveWindow::ALWAYS,
            next_seq: 0,
            primary_count: 0,
            secondary_count: 0,
            ignored: 0,
        }
    }

    pub fn with_window(mut self, window: ActiveWindow) -> Self {
        self.window = window;
        self
    }

    pub fn bias(&self) -> RelayBias {
        self.bias
    }

    /// 实际观测到的 Primary 比例
    pub fn primary_ratio(&self) -> Option<f64> {
        let total = self.primary_count + self.secondary_count;
        (total > 0).then(|| self.primary_count as f64 / total as f64)
    }
}

impl Application for RelayApp {
    #[tracing::instrument(skip(self, pkt, sim, net), fields(relay = self.id, pkt_id = pkt.id))]
    fn on_receive(
        &mut self,
        pkt: &Packet,
        src: Address,
        _dst: Address,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        if !self.window.contains(sim.now()) {
            self.ignored += 1;
            trace!("时间窗外到达，不转发");
            return;
        }

        let payload = Payload {
            size_bytes: pkt.size_bytes,
            source_id: self.id,
            sequence_no: self.next_seq,
        };
        self.next_seq += 1;

        let egress = self.decision.decide(self.bias.get());
        let res = match egress {
            Egress::Primary => {
                self.primary_count += 1;
                net.send(self.primary, payload, sim)
            }
            Egress::Secondary => {
                self.secondary_count += 1;
                net.send_to(self.secondary, payload, src, sim)
            }
        };
        match res {
            Ok(()) => debug!(?egress, size = pkt.size_bytes, "中继转发"),
            Err(e) => warn!(?egress, error = %e, "中继转发失败"),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
