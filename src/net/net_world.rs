//! 网络世界实现
//!
//! 定义网络仿真的世界（World）实现，持有网络拓扑、流量源和队列采样器。

use super::id::{Address, NodeId};
use super::network::Network;
use crate::monitor::{QueueSampler, SamplerId};
use crate::random::RandomProcess;
use crate::sim::{SimTime, Simulator, World};
use crate::traffic::{SourceId, TrafficSource};
use std::any::Any;

/// 一个默认的网络世界实现。
#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
    pub sources: Vec<TrafficSource>,
    pub samplers: Vec<QueueSampler>,
}

impl NetWorld {
    /// 在 `node` 上创建一个 connect 到 `dst` 的套接字，并挂一个流量源。
    pub fn add_source(
        &mut self,
        node: NodeId,
        dst: Address,
        size_process: RandomProcess,
        interval_process: RandomProcess,
    ) -> SourceId {
        let socket = self.net.create_socket(node);
        self.net.connect_socket(socket, dst);
        let id = SourceId(self.sources.len());
        self.sources
            .push(TrafficSource::new(id, socket, size_process, interval_process));
        id
    }

    pub fn start_source(&mut self, id: SourceId, at: SimTime, sim: &mut Simulator) {
        if let Some(src) = self.sources.get_mut(id.0) {
            src.start(at, sim);
        }
    }

    pub fn source(&self, id: SourceId) -> Option<&TrafficSource> {
        self.sources.get(id.0)
    }

    /// 注册采样器并调度它的全部采样事件
    pub fn add_sampler(&mut self, mut sampler: QueueSampler, sim: &mut Simulator) -> SamplerId {
        let id = SamplerId(self.samplers.len());
        sampler.schedule_all(id, sim);
        self.samplers.push(sampler);
        id
    }

    pub fn sampler(&self, id: SamplerId) -> Option<&QueueSampler> {
        self.samplers.get(id.0)
    }
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
