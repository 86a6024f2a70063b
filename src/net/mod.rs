//! 网络模拟模块
//!
//! 此模块包含网络模拟的核心组件，如节点、链路、套接字、数据包和网络拓扑。

// 子模块声明
mod app;
mod events;
mod id;
mod link;
mod net_world;
mod network;
mod node;
mod packet;
mod routing;

// 重新导出公共接口
pub use app::{Application, PacketSink};
pub use events::{PacketArrival, TxComplete};
pub use id::{Address, LinkId, NodeId, SocketId};
pub use link::Link;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Host, Node, Router};
pub use packet::{MIN_PACKET_BYTES, Packet, Payload};
pub use routing::RoutingTable;
