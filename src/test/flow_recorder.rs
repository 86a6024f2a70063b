use crate::flow::{DropCause, DropCount, FlowId, FlowKey, FlowRecorder, FlowReport};
use crate::net::{Address, NodeId};
use crate::sim::SimTime;

fn key(src: usize, dst: usize) -> FlowKey {
    FlowKey {
        src: Address::new(NodeId(src), 49_153),
        dst: Address::new(NodeId(dst), 9),
    }
}

#[test]
fn flow_ids_follow_first_appearance() {
    let mut r = FlowRecorder::default();
    r.on_send(key(2, 0), 100, SimTime::ZERO);
    r.on_drop(key(1, 0), 50, DropCause::NoRoute, SimTime::ZERO);
    r.on_send(key(2, 0), 100, SimTime::from_millis(1));

    assert_eq!(r.len(), 2);
    assert_eq!(r.flow_id(&key(2, 0)), Some(FlowId(1)));
    assert_eq!(r.flow_id(&key(1, 0)), Some(FlowId(2)));
    assert_eq!(r.flow_id(&key(0, 2)), None);

    let ids: Vec<u32> = r.iter().map(|(id, _, _)| id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn single_receive_has_no_throughput() {
    let mut r = FlowRecorder::default();
    let k = key(0, 1);
    r.on_send(k, 100, SimTime::ZERO);
    r.on_receive(k, 100, SimTime::from_millis(3), SimTime::from_millis(3));

    let c = r.summary(&k).expect("flow exists");
    assert_eq!(c.rx_packets, 1);
    assert_eq!(c.throughput_bps(), None);
    assert_eq!(c.offered_load_bps(), None);
    assert_eq!(c.mean_delay_secs(), Some(0.003));
    assert_eq!(c.in_flight_packets(), 0);
}

#[test]
fn rates_use_first_to_last_interval() {
    let mut r = FlowRecorder::default();
    let k = key(0, 1);
    for i in 0..3u64 {
        r.on_send(k, 125, SimTime::from_millis(i * 500));
    }
    r.on_receive(k, 125, SimTime::from_millis(2), SimTime::from_millis(2));
    r.on_receive(k, 125, SimTime::from_millis(2), SimTime::from_millis(1_002));

    let c = r.summary(&k).expect("flow exists");
    // 375 B * 8 / 1 s
    assert_eq!(c.offered_load_bps(), Some(3_000.0));
    // 250 B * 8 / 1 s
    assert_eq!(c.throughput_bps(), Some(2_000.0));
    assert_eq!(c.in_flight_packets(), 1);
}

#[test]
fn drops_are_kept_per_cause() {
    let mut r = FlowRecorder::default();
    let k = key(3, 4);
    for _ in 0..3 {
        r.on_send(k, 200, SimTime::ZERO);
    }
    r.on_drop(k, 200, DropCause::QueueOverflow, SimTime::ZERO);
    r.on_drop(k, 200, DropCause::QueueOverflow, SimTime::ZERO);
    r.on_drop(k, 200, DropCause::LinkDown, SimTime::ZERO);

    let c = r.summary(&k).expect("flow exists");
    assert_eq!(
        c.dropped_by(DropCause::QueueOverflow),
        DropCount {
            packets: 2,
            bytes: 400
        }
    );
    assert_eq!(c.dropped_by(DropCause::NoRoute), DropCount::default());
    assert_eq!(c.dropped_packets(), 3);
    assert_eq!(c.in_flight_packets(), 0);
    assert_eq!(r.total_tx_bytes(), 600);
}

#[test]
fn report_serializes_undefined_rates_as_null() {
    let mut r = FlowRecorder::default();
    let k = key(0, 1);
    r.on_send(k, 100, SimTime::ZERO);
    r.on_drop(k, 100, DropCause::QueueOverflow, SimTime::ZERO);

    let reports = FlowReport::collect(&r);
    assert_eq!(reports.len(), 1);
    let v = serde_json::to_value(&reports[0]).expect("serialize");
    assert_eq!(v["flow_id"], 1);
    assert_eq!(v["src"], "n0:49153");
    assert_eq!(v["dst"], "n1:9");
    assert!(v["throughput_bps"].is_null());
    assert!(v["mean_delay_s"].is_null());
    assert_eq!(v["dropped"]["queue_overflow"]["packets"], 1);
}

#[test]
fn flow_key_display_uses_addresses() {
    assert_eq!(key(0, 7).to_string(), "n0:49153 -> n7:9");
    let rejected = FlowKey {
        src: Address::new(NodeId(1), 5),
        dst: Address::UNSPECIFIED,
    };
    assert_eq!(rejected.to_string(), "n1:5 -> *:*");
}
