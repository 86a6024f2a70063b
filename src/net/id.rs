//! 标识符类型
//!
//! 定义节点、链路、套接字的唯一标识符以及传输层地址。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 链路标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub usize);

/// 套接字句柄（由网络持有，对上层不透明）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketId(pub usize);

/// 传输层地址：节点 + 端口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub node: NodeId,
    pub port: u16,
}

impl Address {
    /// 未指定的对端（例如未 connect 的套接字发送失败时用作流的目的地址）
    pub const UNSPECIFIED: Address = Address {
        node: NodeId(usize::MAX),
        port: 0,
    };

    pub fn new(node: NodeId, port: u16) -> Self {
        Self { node, port }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Address::UNSPECIFIED {
            write!(f, "*:*")
        } else {
            write!(f, "n{}:{}", self.node.0, self.port)
        }
    }
}
