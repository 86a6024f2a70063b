use crate::config::{ScenarioConfig, SourceConfig};
use crate::flow::FlowKey;
use crate::monitor::{QueueSample, QueueSampler};
use crate::net::{Address, NetWorld, PacketSink};
use crate::random::{Distribution, SeedSource};
use crate::relay::RelayApp;
use crate::scenario::Scenario;
use crate::sim::{SimTime, Simulator};
use crate::topo::line::{LineOpts, build_line};

fn short_config(seed: u64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::default();
    cfg.seed = seed;
    cfg.stop_s = 3.0;
    cfg
}

fn run_scenario(cfg: &ScenarioConfig) -> (Simulator, NetWorld, Scenario) {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let scenario = Scenario::setup(cfg, &mut sim, &mut world).expect("valid config");
    scenario.run(&mut sim, &mut world);
    (sim, world, scenario)
}

#[test]
fn single_source_through_bottleneck_end_to_end() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let topo = build_line(&mut world, &LineOpts::default());
    let dst = Address::new(topo.sink, 9);
    world.net.listen(dst, Box::new(PacketSink::default()));

    let mut seeds = SeedSource::new(2024);
    let size = seeds.process(Distribution::exponential(100.0).expect("valid"));
    let interval = seeds.process(Distribution::exponential(0.002).expect("valid"));
    let id = world.add_source(topo.src, dst, size, interval);
    world.start_source(id, SimTime::from_secs(2), &mut sim);

    let sampler = QueueSampler::new(
        vec![topo.bottleneck],
        SimTime::from_millis(1),
        SimTime::from_secs(2),
        SimTime::from_secs(10),
    )
    .expect("valid sampler");
    let sampler = world.add_sampler(sampler, &mut sim);
    sim.stop_at(SimTime::from_secs(10));
    sim.run(&mut world);

    assert_eq!(sim.now(), SimTime::from_secs(10));
    let samples = world.sampler(sampler).expect("sampler").samples();
    assert_eq!(samples.len(), 8_000);
    assert!(samples.iter().all(|s| s.depth <= 1_000));
    assert!(samples.windows(2).all(|w| w[0].time < w[1].time));

    let src = world.source(id).expect("source");
    assert!(src.emitted() > 3_000 && src.emitted() < 5_000);
    assert_eq!(world.net.flows.total_tx_bytes(), src.bytes_emitted());

    let sink = world.net.listener::<PacketSink>(dst).expect("sink");
    let c = world
        .net
        .flows
        .iter()
        .map(|(_, _, c)| c)
        .next()
        .expect("one flow");
    assert_eq!(sink.rx_packets, c.rx_packets);
    assert!(c.rx_packets <= c.tx_packets);
    assert!(c.throughput_bps().is_some());
}

#[test]
fn default_scenario_relays_and_samples_both_server_queues() {
    let (sim, world, scenario) = run_scenario(&short_config(1));
    assert_eq!(sim.now(), SimTime::from_secs(3));

    let sampler = world.sampler(scenario.sampler).expect("sampler");
    // [1, 3) 每 1 ms 一次，两个队列
    assert_eq!(sampler.samples().len(), 4_000);
    for &q in &scenario.monitored {
        assert_eq!(sampler.samples_for(q).count(), 2_000);
        assert!(sampler.max_depth(q).is_some_and(|d| d <= 10_000));
    }

    let relay = scenario.relay_app(&world).expect("relay registered");
    assert!(relay.primary_count > 0);
    assert!(relay.secondary_count > 0);
    let ratio = relay.primary_ratio().expect("relay forwarded");
    assert!((ratio - 0.7).abs() < 0.05, "primary ratio {ratio}");

    let sink = world
        .net
        .listener::<PacketSink>(scenario.downstream)
        .expect("downstream sink");
    assert!(sink.rx_packets <= relay.primary_count);
    assert!(sink.rx_packets > 0);

    for &id in &scenario.sources {
        assert!(world.source(id).is_some_and(|s| s.emitted() > 0));
    }
    let client = world.net.socket_addr(world.sources[0].socket()).expect("socket");
    let to_relay = world
        .net
        .flows
        .summary(&FlowKey {
            src: client,
            dst: scenario.relay,
        })
        .expect("source flow recorded");
    assert_eq!(to_relay.tx_packets, world.sources[0].emitted());
}

#[test]
fn same_seed_reproduces_run_and_different_seed_does_not() {
    let trace = |seed: u64| -> (Vec<QueueSample>, u64, u64) {
        let (_, world, scenario) = run_scenario(&short_config(seed));
        let relay = scenario.relay_app(&world).expect("relay");
        (
            world
                .sampler(scenario.sampler)
                .expect("sampler")
                .samples()
                .to_vec(),
            relay.primary_count,
            relay.secondary_count,
        )
    };
    let a = trace(7);
    assert_eq!(a, trace(7));
    let b = trace(8);
    assert_ne!((a.1, a.2), (b.1, b.2));
}

#[test]
fn invalid_configuration_schedules_nothing() {
    let with = |edit: fn(&mut ScenarioConfig)| {
        let mut c = ScenarioConfig::default();
        edit(&mut c);
        c
    };
    let cases = [
        (with(|c| c.relay.bias = 1.0), "BiasOutOfRange"),
        (
            with(|c| c.sources = vec![SourceConfig::exponential("z", 0.002, 100.0)]),
            "UnknownHost(\"z\")",
        ),
        (with(|c| c.sources.clear()), "NoSources"),
        (
            with(|c| {
                c.sources[1].interval = Distribution::Exponential {
                    mean: 0.0,
                    bound: None,
                }
            }),
            "NonPositiveMean",
        ),
        (with(|c| c.sampling.period_s = 0.0), "NonPositivePeriod"),
        (with(|c| c.sampling.start_s = 12.0), "EmptyHorizon"),
        (with(|c| c.queue_pkts = 0), "ZeroQueueCapacity"),
        (
            with(|c| {
                c.stop_s = 3.0;
                c.sampling.end_s = Some(11.0);
            }),
            "PastStop { name: \"sampling.end_s\"",
        ),
        (
            with(|c| {
                c.relay.start_s = 10.0;
                c.relay.stop_s = 1.0;
            }),
            "EmptyHorizon { start: 10.0, end: 1.0 }",
        ),
        (with(|c| c.stop_s = f64::INFINITY), "InvalidTime { name: \"stop_s\""),
    ];

    for (cfg, expected) in cases {
        let mut sim = Simulator::default();
        let mut world = NetWorld::default();
        let err = Scenario::setup(&cfg, &mut sim, &mut world).expect_err("config must be rejected");
        let got = format!("{err:?}");
        assert!(got.starts_with(expected), "expected {expected}, got {got}");
        assert_eq!(sim.pending(), 0);
        assert_eq!(world.net.node_count(), 0);
    }
}

#[test]
fn config_fills_missing_fields_with_defaults() {
    let cfg: ScenarioConfig = serde_json::from_str(
        r#"{
            "seed": 5,
            "relay": { "bias": 0.3 },
            "sources": [
                { "host": "c",
                  "interval": { "kind": "exponential", "mean": 0.001 },
                  "size": { "kind": "uniform", "min": 50.0, "max": 150.0 } }
            ]
        }"#,
    )
    .expect("parse config");

    assert_eq!(cfg.seed, 5);
    assert_eq!(cfg.stop_s, 11.0);
    assert_eq!(cfg.relay.bias, 0.3);
    assert_eq!(cfg.relay.port, 9);
    assert_eq!(cfg.sampling.period_s, 0.001);
    assert_eq!(cfg.sampling_end_s(), 11.0);
    assert_eq!(cfg.sources.len(), 1);
    assert_eq!(cfg.sources[0].start_s, 2.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn relay_app_is_reachable_through_typed_listener() {
    let (_, world, scenario) = run_scenario(&short_config(3));
    assert!(world.net.listener::<RelayApp>(scenario.relay).is_some());
    assert!(world.net.listener::<PacketSink>(scenario.relay).is_none());
}
