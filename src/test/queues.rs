use crate::net::{Address, NodeId, Packet};
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::SimTime;

fn pkt(id: u64, size_bytes: u32) -> Packet {
    Packet {
        id,
        src: Address::new(NodeId(0), 1),
        dst: Address::new(NodeId(1), 9),
        size_bytes,
        source_id: 0,
        sequence_no: id,
        origin_time: SimTime::ZERO,
    }
}

#[test]
fn droptail_queue_enforces_packet_capacity_and_preserves_order() {
    let mut q = DropTailQueue::new(2);
    assert_eq!(q.capacity_packets(), 2);
    assert!(q.is_empty());
    assert_eq!(q.bytes(), 0);

    assert!(q.enqueue(pkt(1, 60)).is_ok());
    assert!(q.enqueue(pkt(2, 1500)).is_ok());
    assert_eq!(q.len(), 2);
    assert_eq!(q.bytes(), 1560);

    let dropped = q.enqueue(pkt(3, 12)).expect_err("should drop");
    assert_eq!(dropped.id, 3);
    assert_eq!(q.len(), 2);
    assert_eq!(q.bytes(), 1560);

    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.len(), 1);
    assert_eq!(q.bytes(), 1500);
    assert_eq!(q.dequeue().expect("pkt").id, 2);
    assert!(q.dequeue().is_none());
    assert_eq!(q.bytes(), 0);
}

#[test]
fn droptail_queue_capacity_counts_packets_not_bytes() {
    let mut q = DropTailQueue::new(3);
    for id in 0..3 {
        assert!(q.enqueue(pkt(id, 65_000)).is_ok());
    }
    assert!(q.enqueue(pkt(9, 12)).is_err());
    assert_eq!(q.len(), 3);
}

#[test]
fn droptail_queue_with_zero_capacity_drops_everything() {
    let mut q = DropTailQueue::new(0);
    assert!(q.enqueue(pkt(1, 12)).is_err());
    assert!(q.is_empty());
}
