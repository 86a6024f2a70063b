//! 接收应用
//!
//! 绑定在某个地址上的接收处理器：网络在包送达目的地址时同步调用它。

use std::any::Any;

use super::id::Address;
use super::network::Network;
use super::packet::Packet;
use crate::sim::Simulator;

/// 接收回调：`(packet, src_address, dst_address)`。
pub trait Application: Any + Send {
    fn on_receive(
        &mut self,
        pkt: &Packet,
        src: Address,
        dst: Address,
        sim: &mut Simulator,
        net: &mut Network,
    );

    fn as_any(&self) -> &dyn Any;
}

/// 只计数的接收端（等价于一个不回包的 UDP server）。
#[derive(Debug, Default)]
pub struct PacketSink {
    pub rx_packets: u64,
    pub rx_bytes: u64,
}

impl Application for PacketSink {
    fn on_receive(
        &mut self,
        pkt: &Packet,
        _src: Address,
        _dst: Address,
        _sim: &mut Simulator,
        _net: &mut Network,
    ) {
        self.rx_packets += 1;
        self.rx_bytes += pkt.size_bytes as u64;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
