//! 流量源状态

use tracing::{debug, trace, warn};

use super::fire::FireSource;
use crate::net::{MIN_PACKET_BYTES, Network, Payload, SocketId};
use crate::random::RandomProcess;
use crate::sim::{EventId, SimTime, Simulator};

/// 流量源在 `NetWorld::sources` 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub usize);

/// 一个自我重调度的流量源。
///
/// 自身不做仿真时长检查：超出停止时间的激活由仿真器负责不执行。
#[derive(Debug)]
pub struct TrafficSource {
    id: SourceId,
    socket: SocketId,
    size_process: RandomProcess,
    interval_process: RandomProcess,
    next_fire: Option<(SimTime, EventId)>,
    cancelled: bool,
    emitted: u64,
    bytes_emitted: u64,
}

impl TrafficSource {
    pub fn new(
        id: SourceId,
        socket: SocketId,
        size_process: RandomProcess,
        interval_process: RandomProcess,
    ) -> Self {
        Self {
            id,
            socket,
            size_process,
            interval_process,
            next_fire: None,
            cancelled: false,
            emitted: 0,
            bytes_emitted: 0,
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn socket(&self) -> SocketId {
        self.socket
    }

    /// 已激活（发出包）的次数
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// 已生成的包长总和（截断到最小包长之后）
    pub fn bytes_emitted(&self) -> u64 {
        self.bytes_emitted
    }

    /// 下一次激活时间
    pub fn next_fire_time(&self) -> Option<SimTime> {
        self.next_fire.map(|(at, _)| at)
    }

    /// 调度第一次激活
    pub fn start(&mut self, at: SimTime, sim: &mut Simulator) {
        self.cancelled = false;
        self.arm(at, sim);
    }

    /// 撤回尚未执行的激活，之后不再重调度。
    pub fn cancel(&mut self, sim: &mut Simulator) -> bool {
        self.cancelled = true;
        match self.next_fire.take() {
            Some((_, ev)) => sim.cancel(ev),
            None => false,
        }
    }

    fn arm(&mut self, at: SimTime, sim: &mut Simulator) {
        let ev = sim.schedule(at, FireSource { source: self.id });
        self.next_fire = Some((at, ev));
    }

    /// 一次激活：抽包长、发送、抽间隔、重调度。
    #[tracing::instrument(skip(self, sim, net), fields(source = self.id.0))]
    pub fn fire(&mut self, sim: &mut Simulator, net: &mut Network) {
        self.next_fire = None;
        if self.cancelled {
            return;
        }
        let now = sim.now();

        let sampled = self.size_process.sample_int();
        let size = sampled.max(MIN_PACKET_BYTES as u64).min(u32::MAX as u64) as u32;
        let payload = Payload {
            size_bytes: size,
            source_id: self.id.0 as u64,
            sequence_no: self.emitted,
        };
        self.emitted += 1;
        self.bytes_emitted += size as u64;

        if let Err(e) = net.send(self.socket, payload, sim) {
            warn!(error = %e, "发送失败，继续生成流量");
        } else {
            trace!(sampled, size, seq = payload.sequence_no, "发出数据包");
        }

        let interval = self.interval_process.sample();
        let next = now.saturating_add(SimTime::from_secs_f64(interval));
        debug!(interval, next = ?next, "重新调度");
        self.arm(next, sim);
    }
}
