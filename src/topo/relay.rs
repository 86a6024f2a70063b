//! 中继实验拓扑
//!
//! ```text
//!  a ── e ──┐
//!           │        ┌── s (中继服务器)
//!  b ──┐    ├── g ───┤
//!      f ───┤        └── r (下游路由目标)
//!  c ──┘    │
//!  d ───────┘
//! ```
//!
//! 接入链路 5 Mb/s，f-g 与 g-r 8 Mb/s，g-s 10 Mb/s，均为 2 ms 单向时延。

use std::collections::BTreeMap;

use crate::net::{LinkId, NetWorld, NodeId};
use crate::sim::SimTime;

/// 拓扑配置选项
#[derive(Debug, Clone)]
pub struct RelayTopoOpts {
    pub access_mbps: u64,
    pub aggregation_mbps: u64,
    pub server_mbps: u64,
    pub link_latency: SimTime,
    /// 除 g-s 外所有链路的队列容量（包）
    pub device_queue_pkts: u32,
    /// g-s 两个方向的队列容量（包）
    pub server_queue_pkts: u32,
}

impl Default for RelayTopoOpts {
    fn default() -> Self {
        Self {
            access_mbps: 5,
            aggregation_mbps: 8,
            server_mbps: 10,
            link_latency: SimTime::from_millis(2),
            device_queue_pkts: 10,
            server_queue_pkts: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayTopo {
    /// 主机名 -> 节点
    pub hosts: BTreeMap<String, NodeId>,
    pub gateway: NodeId,
    pub server: NodeId,
    pub router: NodeId,
    /// g->s 与 s->g 两条链路（被监控的队列）
    pub server_links: (LinkId, LinkId),
}

impl RelayTopo {
    pub fn host(&self, name: &str) -> Option<NodeId> {
        self.hosts.get(name).copied()
    }
}

/// 可以承载流量源的主机名
pub const SOURCE_HOSTS: [&str; 4] = ["a", "b", "c", "d"];

/// 构建中继实验拓扑
pub fn build_relay_topology(world: &mut NetWorld, opts: &RelayTopoOpts) -> RelayTopo {
    let net = &mut world.net;
    let a = net.add_host("a");
    let e = net.add_router("e");
    let g = net.add_router("g");
    let s = net.add_host("s");
    let b = net.add_host("b");
    let f = net.add_router("f");
    let c = net.add_host("c");
    let d = net.add_host("d");
    let r = net.add_host("r");

    let mbps = |m: u64| m.saturating_mul(1_000_000);
    let lat = opts.link_latency;
    let q = opts.device_queue_pkts;

    net.connect_duplex(a, e, lat, mbps(opts.access_mbps), q);
    net.connect_duplex(e, g, lat, mbps(opts.access_mbps), q);
    net.connect_duplex(b, f, lat, mbps(opts.access_mbps), q);
    net.connect_duplex(c, f, lat, mbps(opts.access_mbps), q);
    net.connect_duplex(d, g, lat, mbps(opts.access_mbps), q);
    net.connect_duplex(f, g, lat, mbps(opts.aggregation_mbps), q);
    net.connect_duplex(g, r, lat, mbps(opts.aggregation_mbps), q);
    let server_links = net.connect_duplex(
        g,
        s,
        lat,
        mbps(opts.server_mbps),
        opts.server_queue_pkts,
    );

    let hosts = [("a", a), ("b", b), ("c", c), ("d", d), ("s", s), ("r", r)]
        .into_iter()
        .map(|(n, id)| (n.to_string(), id))
        .collect();

    RelayTopo {
        hosts,
        gateway: g,
        server: s,
        router: r,
        server_links,
    }
}
