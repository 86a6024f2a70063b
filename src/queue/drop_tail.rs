//! DropTail：满了就丢新来的

use std::collections::VecDeque;

use super::PacketQueue;
use crate::net::Packet;

/// 先进先出队列，容量以包数计。
#[derive(Debug)]
pub struct DropTailQueue {
    limit: usize,
    q: VecDeque<Packet>,
    bytes: u64,
}

impl DropTailQueue {
    pub fn new(limit_packets: u32) -> Self {
        Self {
            limit: limit_packets as usize,
            q: VecDeque::new(),
            bytes: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.q.len() >= self.limit
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet> {
        if self.is_full() {
            return Err(pkt);
        }
        self.bytes += u64::from(pkt.size_bytes);
        self.q.push_back(pkt);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<Packet> {
        self.q.pop_front().inspect(|pkt| {
            self.bytes -= u64::from(pkt.size_bytes);
        })
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn bytes(&self) -> u64 {
        self.bytes
    }

    fn capacity_packets(&self) -> u32 {
        u32::try_from(self.limit).unwrap_or(u32::MAX)
    }
}
