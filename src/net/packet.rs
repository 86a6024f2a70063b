//! 数据包类型
//!
//! 定义网络数据包及其相关操作。

use super::id::Address;
use crate::sim::SimTime;

/// 传输层头部施加的最小包长（字节）；采样得到更小的长度时按此值发送。
pub const MIN_PACKET_BYTES: u32 = 12;

/// 上层交给套接字发送的载荷描述。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    pub size_bytes: u32,
    pub source_id: u64,
    pub sequence_no: u64,
}

/// 网络数据包（创建后不再修改）
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub src: Address,
    pub dst: Address,
    pub size_bytes: u32,
    pub source_id: u64,
    pub sequence_no: u64,
    /// 首次发送时的仿真时间
    pub origin_time: SimTime,
}

impl Packet {
    /// 该包所属流的标识（源地址, 目的地址）
    pub fn flow_key(&self) -> crate::flow::FlowKey {
        crate::flow::FlowKey {
            src: self.src,
            dst: self.dst,
        }
    }
}
