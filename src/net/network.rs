//! 网络拓扑管理
//!
//! 定义网络拓扑结构，包含节点、链路、套接字、数据包转发和流统计。

use std::collections::HashMap;

use super::app::Application;
use super::events::{PacketArrival, TxComplete};
use super::id::{Address, LinkId, NodeId, SocketId};
use super::link::Link;
use super::node::{Host, Node, Router};
use super::packet::{Packet, Payload};
use super::routing::RoutingTable;
use crate::error::SendError;
use crate::flow::{DropCause, FlowKey, FlowRecorder};
use crate::monitor::QueueProbe;
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::{SimTime, Simulator};
use tracing::{debug, trace, warn};

/// 临时端口起点
const EPHEMERAL_PORT_BASE: u16 = 49_153;

#[derive(Debug, Clone)]
struct Socket {
    local: Address,
    peer: Option<Address>,
}

/// 网络拓扑
#[derive(Default)]
pub struct Network {
    nodes: Vec<Option<Box<dyn Node>>>,
    links: Vec<Option<Link>>,
    edges: HashMap<(NodeId, NodeId), LinkId>,
    routing: RoutingTable,
    sockets: Vec<Socket>,
    next_port: HashMap<NodeId, u16>,
    listeners: HashMap<Address, Option<Box<dyn Application>>>,
    next_pkt_id: u64,
    pub flows: FlowRecorder,
}

impl Network {
    /// 添加主机节点
    pub fn add_host(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Host::new(id, name))));
        self.routing.mark_dirty();
        id
    }

    /// 添加路由器节点
    pub fn add_router(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Router::new(id, name))));
        self.routing.mark_dirty();
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 节点名称（节点正在处理包时暂时取出，此时返回 None）
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0)?.as_ref().map(|n| n.name())
    }

    /// 连接两个节点（创建单向链路）
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        self.links.push(Some(Link::new(from, to, latency, bandwidth_bps)));
        self.edges.insert((from, to), id);
        self.routing.mark_dirty();
        id
    }

    /// 创建一对方向相反、参数相同的链路，两端都使用 `queue_pkts` 包的 DropTail 队列。
    pub fn connect_duplex(
        &mut self,
        a: NodeId,
        b: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
        queue_pkts: u32,
    ) -> (LinkId, LinkId) {
        let ab = self.connect(a, b, latency, bandwidth_bps);
        let ba = self.connect(b, a, latency, bandwidth_bps);
        self.set_queue(ab, Box::new(DropTailQueue::new(queue_pkts)));
        self.set_queue(ba, Box::new(DropTailQueue::new(queue_pkts)));
        (ab, ba)
    }

    /// 替换链路上的队列策略（原队列中的包被丢弃，应在仿真开始前调用）。
    pub fn set_queue(&mut self, link: LinkId, queue: Box<dyn PacketQueue>) {
        if let Some(Some(l)) = self.links.get_mut(link.0) {
            l.queue = queue;
        }
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)?.as_ref()
    }

    pub fn link_between(&self, from: NodeId, to: NodeId) -> Option<LinkId> {
        self.edges.get(&(from, to)).copied()
    }

    /// 拆除链路：排队中的包按 `LinkDown` 丢弃，已在线路上的包照常送达。
    pub fn remove_link(&mut self, id: LinkId, now: SimTime) -> bool {
        let Some(mut link) = self.links.get_mut(id.0).and_then(Option::take) else {
            return false;
        };
        self.edges.remove(&(link.from, link.to));
        while let Some(pkt) = link.queue.dequeue() {
            self.flows
                .on_drop(pkt.flow_key(), pkt.size_bytes, DropCause::LinkDown, now);
        }
        self.routing.mark_dirty();
        debug!(link_id = ?id, from = ?link.from, to = ?link.to, "链路已拆除");
        true
    }

    /// 在节点上创建一个套接字，自动分配临时端口。
    pub fn create_socket(&mut self, node: NodeId) -> SocketId {
        let port = self.next_port.entry(node).or_insert(EPHEMERAL_PORT_BASE);
        let local = Address::new(node, *port);
        *port = port.wrapping_add(1).max(EPHEMERAL_PORT_BASE);
        let id = SocketId(self.sockets.len());
        self.sockets.push(Socket { local, peer: None });
        id
    }

    /// 把套接字绑定到指定端口
    pub fn bind(&mut self, socket: SocketId, port: u16) {
        if let Some(s) = self.sockets.get_mut(socket.0) {
            s.local.port = port;
        }
    }

    /// 设置默认对端（之后可用 `send` 做非寻址发送）
    pub fn connect_socket(&mut self, socket: SocketId, peer: Address) {
        if let Some(s) = self.sockets.get_mut(socket.0) {
            s.peer = Some(peer);
        }
    }

    pub fn socket_addr(&self, socket: SocketId) -> Option<Address> {
        self.sockets.get(socket.0).map(|s| s.local)
    }

    /// 在地址上注册接收应用
    pub fn listen(&mut self, addr: Address, app: Box<dyn Application>) {
        self.listeners.insert(addr, Some(app));
    }

    /// 按具体类型读取某地址上的接收应用
    pub fn listener<A: Application>(&self, addr: Address) -> Option<&A> {
        self.listeners
            .get(&addr)?
            .as_ref()?
            .as_any()
            .downcast_ref::<A>()
    }

    /// 非寻址发送：发往套接字 connect 的对端。
    pub fn send(
        &mut self,
        socket: SocketId,
        payload: Payload,
        sim: &mut Simulator,
    ) -> Result<(), SendError> {
        self.send_from(socket, payload, None, sim)
    }

    /// 寻址发送：发往 `dst`。
    pub fn send_to(
        &mut self,
        socket: SocketId,
        payload: Payload,
        dst: Address,
        sim: &mut Simulator,
    ) -> Result<(), SendError> {
        self.send_from(socket, payload, Some(dst), sim)
    }

    /// 发送失败按 `TransportRejected` 记入流统计后返回错误；成功则记一次发送。
    #[tracing::instrument(skip(self, payload, sim), fields(size = payload.size_bytes))]
    fn send_from(
        &mut self,
        socket: SocketId,
        payload: Payload,
        dst: Option<Address>,
        sim: &mut Simulator,
    ) -> Result<(), SendError> {
        let now = sim.now();
        let Some(sock) = self.sockets.get(socket.0).cloned() else {
            let key = FlowKey {
                src: Address::UNSPECIFIED,
                dst: dst.unwrap_or(Address::UNSPECIFIED),
            };
            self.flows
                .on_drop(key, payload.size_bytes, DropCause::TransportRejected, now);
            return Err(SendError::UnknownSocket(socket.0));
        };
        let src = sock.local;
        let Some(dst) = dst.or(sock.peer) else {
            let key = FlowKey {
                src,
                dst: Address::UNSPECIFIED,
            };
            self.flows
                .on_drop(key, payload.size_bytes, DropCause::TransportRejected, now);
            return Err(SendError::NotConnected(socket.0));
        };

        let next = if dst.node == src.node {
            None
        } else {
            match self.next_hop(src.node, dst.node) {
                Some(nh) => Some(nh),
                None => {
                    let key = FlowKey { src, dst };
                    self.flows
                        .on_drop(key, payload.size_bytes, DropCause::TransportRejected, now);
                    return Err(SendError::NoRoute {
                        from: src.node.0,
                        dst,
                    });
                }
            }
        };

        let pkt = self.make_packet(src, dst, payload, now);
        self.flows.on_send(pkt.flow_key(), pkt.size_bytes, now);
        trace!(pkt_id = pkt.id, src = %src, dst = %dst, "🚀 发送数据包");

        match next {
            // 本机回环：下一个调度轮次交付，避免在发送方回调内重入接收方
            None => {
                sim.schedule(now, PacketArrival { to: dst.node, pkt });
            }
            Some(nh) => self.transmit(src.node, nh, pkt, sim),
        }
        Ok(())
    }

    fn make_packet(&mut self, src: Address, dst: Address, payload: Payload, now: SimTime) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet {
            id,
            src,
            dst,
            size_bytes: payload.size_bytes,
            source_id: payload.source_id,
            sequence_no: payload.sequence_no,
            origin_time: now,
        }
    }

    fn next_hop(&mut self, from: NodeId, dst: NodeId) -> Option<NodeId> {
        if self.routing.is_dirty() {
            let n = self.nodes.len();
            let mut adj = vec![Vec::new(); n];
            let mut rev_adj = vec![Vec::new(); n];
            for link in self.links.iter().flatten() {
                adj[link.from.0].push(link.to);
                rev_adj[link.to.0].push(link.from);
            }
            self.routing.ensure_built(&adj, &rev_adj);
        }
        self.routing.next_hop(from, dst)
    }

    /// 将数据包交付给节点处理
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
        let Some(mut node) = self.nodes.get_mut(to.0).and_then(Option::take) else {
            warn!(to = ?to, pkt_id = pkt.id, "目标节点不存在，丢弃数据包");
            return;
        };
        node.on_packet(pkt, sim, self);
        self.nodes[to.0] = Some(node);
    }

    /// 从指定节点转发数据包
    pub fn forward_from(&mut self, from: NodeId, pkt: Packet, sim: &mut Simulator) {
        match self.next_hop(from, pkt.dst.node) {
            Some(to) => self.transmit(from, to, pkt, sim),
            None => {
                debug!(pkt_id = pkt.id, from = ?from, dst = %pkt.dst, "无路由，丢弃");
                self.flows
                    .on_drop(pkt.flow_key(), pkt.size_bytes, DropCause::NoRoute, sim.now());
            }
        }
    }

    /// 把包放到 from->to 链路上：链路空闲则立即开始序列化，否则入队（队满丢弃）。
    fn transmit(&mut self, from: NodeId, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        let now = sim.now();
        let Some(link_id) = self.link_between(from, to) else {
            self.flows
                .on_drop(pkt.flow_key(), pkt.size_bytes, DropCause::NoRoute, now);
            return;
        };
        let Some(link) = self.links[link_id.0].as_mut() else {
            self.flows
                .on_drop(pkt.flow_key(), pkt.size_bytes, DropCause::NoRoute, now);
            return;
        };

        if link.is_idle(now) {
            self.start_tx(link_id, pkt, sim);
            return;
        }
        if let Err(pkt) = link.queue.enqueue(pkt) {
            trace!(
                pkt_id = pkt.id,
                link_id = ?link_id,
                q_len = link.queue.len(),
                "队列已满，尾丢弃"
            );
            self.flows
                .on_drop(pkt.flow_key(), pkt.size_bytes, DropCause::QueueOverflow, now);
        }
    }

    fn start_tx(&mut self, link_id: LinkId, pkt: Packet, sim: &mut Simulator) {
        let Some(link) = self.links[link_id.0].as_mut() else {
            return;
        };
        let now = sim.now();
        let start = now.max(link.busy_until);
        let depart = start.saturating_add(link.tx_time(pkt.size_bytes));
        link.busy_until = depart;
        let arrive = depart.saturating_add(link.latency);
        let to = link.to;

        trace!(pkt_id = pkt.id, ?link_id, ?depart, ?arrive, "开始序列化");
        sim.schedule(depart, TxComplete { link_id });
        sim.schedule(arrive, PacketArrival { to, pkt });
    }

    /// 链路空闲：发送队列中的下一个包
    pub(crate) fn on_link_ready(&mut self, link_id: LinkId, sim: &mut Simulator) {
        let Some(link) = self.links.get_mut(link_id.0).and_then(Option::as_mut) else {
            return;
        };
        if link.busy_until > sim.now() {
            return;
        }
        if let Some(pkt) = link.queue.dequeue() {
            self.start_tx(link_id, pkt, sim);
        }
    }

    /// 数据包送达目的节点：记一次接收，再交给绑定在目的地址上的应用（若有）。
    pub(crate) fn on_delivered(&mut self, at: NodeId, pkt: Packet, sim: &mut Simulator) {
        let now = sim.now();
        let delay = now.saturating_sub(pkt.origin_time);
        self.flows
            .on_receive(pkt.flow_key(), pkt.size_bytes, delay, now);

        let Some(mut app) = self.listeners.get_mut(&pkt.dst).and_then(Option::take) else {
            trace!(at = ?at, dst = %pkt.dst, "目的地址无监听应用");
            return;
        };
        let (src, dst) = (pkt.src, pkt.dst);
        app.on_receive(&pkt, src, dst, sim, self);
        self.listeners.insert(dst, Some(app));
    }
}

impl QueueProbe for Network {
    fn queue_depth(&self, queue: LinkId) -> Option<u32> {
        self.link(queue)
            .map(|l| l.queue.len().min(u32::MAX as usize) as u32)
    }
}
