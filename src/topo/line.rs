//! 单瓶颈线形拓扑：src -> router -> sink

use crate::net::{LinkId, NetWorld, NodeId};
use crate::sim::SimTime;

#[derive(Debug, Clone)]
pub struct LineOpts {
    pub access_bps: u64,
    pub bottleneck_bps: u64,
    pub link_latency: SimTime,
    pub access_queue_pkts: u32,
    /// router -> sink 的队列容量（包）
    pub bottleneck_queue_pkts: u32,
}

impl Default for LineOpts {
    fn default() -> Self {
        Self {
            access_bps: 100_000_000,
            bottleneck_bps: 1_000_000,
            link_latency: SimTime::from_millis(2),
            access_queue_pkts: 10_000,
            bottleneck_queue_pkts: 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LineTopo {
    pub src: NodeId,
    pub router: NodeId,
    pub sink: NodeId,
    /// router -> sink
    pub bottleneck: LinkId,
}

pub fn build_line(world: &mut NetWorld, opts: &LineOpts) -> LineTopo {
    let net = &mut world.net;
    let src = net.add_host("src");
    let router = net.add_router("router");
    let sink = net.add_host("sink");

    net.connect_duplex(
        src,
        router,
        opts.link_latency,
        opts.access_bps,
        opts.access_queue_pkts,
    );
    let (bottleneck, _) = net.connect_duplex(
        router,
        sink,
        opts.link_latency,
        opts.bottleneck_bps,
        opts.bottleneck_queue_pkts,
    );

    LineTopo {
        src,
        router,
        sink,
        bottleneck,
    }
}
