//! 网络内部事件：包到达节点、链路发送完成

use tracing::trace;

use super::id::{LinkId, NodeId};
use super::net_world::NetWorld;
use super::packet::Packet;
use crate::sim::{Event, Simulator, World};

fn net_world(world: &mut dyn World) -> &mut NetWorld {
    world
        .as_any_mut()
        .downcast_mut::<NetWorld>()
        .expect("world must be NetWorld")
}

/// 包传播到 `to`，交给该节点处理（转发或送达）。
#[derive(Debug)]
pub struct PacketArrival {
    pub to: NodeId,
    pub pkt: Packet,
}

impl Event for PacketArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let PacketArrival { to, pkt } = *self;
        trace!(pkt_id = pkt.id, to = ?to, now = ?sim.now(), "📨 数据包到达节点");
        net_world(world).net.deliver(to, pkt, sim);
    }
}

/// 链路上一个包序列化完毕，可以开始发送队首的下一个包。
#[derive(Debug)]
pub struct TxComplete {
    pub link_id: LinkId,
}

impl Event for TxComplete {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TxComplete { link_id } = *self;
        net_world(world).net.on_link_ready(link_id, sim);
    }
}
