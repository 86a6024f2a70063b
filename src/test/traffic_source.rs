use crate::flow::DropCause;
use crate::net::{Address, MIN_PACKET_BYTES, NetWorld, PacketSink};
use crate::random::{Distribution, RandomProcess};
use crate::sim::{SimTime, Simulator};
use crate::topo::line::{LineOpts, build_line};
use crate::traffic::{SourceId, TrafficSource};

const INTERVAL_SEED: u64 = 77;

fn interval_dist() -> Distribution {
    Distribution::exponential(0.002).expect("valid")
}

/// 按同一种子独立复算激活时刻，统计严格早于 `stop` 的次数。
fn expected_activations(start: SimTime, stop: SimTime) -> u64 {
    let mut twin = RandomProcess::new(interval_dist(), INTERVAL_SEED);
    let mut t = start;
    let mut n = 0;
    while t < stop {
        n += 1;
        t = t.saturating_add(SimTime::from_secs_f64(twin.sample()));
    }
    n
}

#[test]
fn activation_count_matches_renewal_process() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let topo = build_line(&mut world, &LineOpts::default());
    let dst = Address::new(topo.sink, 9);
    world.net.listen(dst, Box::new(PacketSink::default()));

    let size = RandomProcess::new(Distribution::exponential(100.0).expect("valid"), 1);
    let interval = RandomProcess::new(interval_dist(), INTERVAL_SEED);
    let id = world.add_source(topo.src, dst, size, interval);

    let start = SimTime::from_secs(2);
    let stop = SimTime::from_secs(10);
    world.start_source(id, start, &mut sim);
    sim.stop_at(stop);
    sim.run(&mut world);

    let src = world.source(id).expect("source exists");
    let expected = expected_activations(start, stop);
    assert!(expected > 3_000, "expected roughly 4000 activations, got {expected}");
    assert_eq!(src.emitted(), expected);
    // 最后一次激活之后的重调度落在停止时间之后
    assert!(src.next_fire_time().is_some_and(|t| t >= stop));
    assert_eq!(world.net.flows.total_tx_bytes(), src.bytes_emitted());
}

#[test]
fn sampled_sizes_below_minimum_are_raised() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let topo = build_line(&mut world, &LineOpts::default());
    let dst = Address::new(topo.sink, 9);

    // 包长抽样恒在 [0, 12) 之内
    let size = RandomProcess::new(Distribution::uniform(0.0, 12.0).expect("valid"), 3);
    let interval = RandomProcess::new(interval_dist(), 4);
    let id = world.add_source(topo.src, dst, size, interval);
    world.start_source(id, SimTime::ZERO, &mut sim);
    sim.stop_at(SimTime::from_millis(100));
    sim.run(&mut world);

    let src = world.source(id).expect("source exists");
    assert!(src.emitted() > 0);
    assert_eq!(src.bytes_emitted(), src.emitted() * MIN_PACKET_BYTES as u64);
}

#[test]
fn cancel_before_first_activation_emits_nothing() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let topo = build_line(&mut world, &LineOpts::default());
    let dst = Address::new(topo.sink, 9);

    let size = RandomProcess::new(Distribution::exponential(100.0).expect("valid"), 1);
    let interval = RandomProcess::new(interval_dist(), 2);
    let id = world.add_source(topo.src, dst, size, interval);
    world.start_source(id, SimTime::from_secs(1), &mut sim);

    let cancelled = world.sources[id.0].cancel(&mut sim);
    assert!(cancelled);
    assert!(!world.sources[id.0].cancel(&mut sim));

    sim.run(&mut world);
    assert_eq!(world.sources[id.0].emitted(), 0);
    assert!(world.net.flows.is_empty());
}

#[test]
fn send_failures_do_not_stop_generation() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let lonely = world.net.add_host("lonely");

    // 未 connect 的套接字：每次发送都被拒绝
    let socket = world.net.create_socket(lonely);
    let id = SourceId(world.sources.len());
    world.sources.push(TrafficSource::new(
        id,
        socket,
        RandomProcess::new(Distribution::exponential(100.0).expect("valid"), 5),
        RandomProcess::new(Distribution::exponential(0.01).expect("valid"), 6),
    ));
    world.start_source(id, SimTime::ZERO, &mut sim);
    sim.stop_at(SimTime::from_secs(1));
    sim.run(&mut world);

    let emitted = world.sources[id.0].emitted();
    assert!(emitted > 10);

    let (_, _, c) = world.net.flows.iter().next().expect("rejected flow recorded");
    assert_eq!(c.tx_packets, 0);
    assert_eq!(c.dropped_by(DropCause::TransportRejected).packets, emitted);
}

#[test]
fn cancel_mid_run_stops_further_activations() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let topo = build_line(&mut world, &LineOpts::default());
    let dst = Address::new(topo.sink, 9);

    let size = RandomProcess::new(Distribution::exponential(100.0).expect("valid"), 1);
    let interval = RandomProcess::new(interval_dist(), INTERVAL_SEED);
    let id = world.add_source(topo.src, dst, size, interval);
    world.start_source(id, SimTime::ZERO, &mut sim);

    sim.run_until(SimTime::from_millis(500), &mut world);
    let before = world.sources[id.0].emitted();
    assert!(before > 0);
    let horizon = SimTime::from_millis(500).saturating_add(SimTime(1));
    assert_eq!(before, expected_activations(SimTime::ZERO, horizon));
    let tx_before = world.net.flows.total_tx_bytes();

    assert!(world.sources[id.0].cancel(&mut sim));
    assert_eq!(world.sources[id.0].next_fire_time(), None);

    sim.run_until(SimTime::from_secs(5), &mut world);
    assert_eq!(world.sources[id.0].emitted(), before);
    assert_eq!(world.net.flows.total_tx_bytes(), tx_before);
    // 在途包都已送达，队列里也没有剩下的激活
    assert_eq!(sim.pending(), 0);
    assert!(world.sources[id.0].next_fire_time().is_none());
}
