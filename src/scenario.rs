//! 中继实验场景
//!
//! 把配置落到拓扑上：流量源发往中继服务器，中继按偏置在下游路由目标与原发送方
//! 之间转发，采样器监控网关与服务器之间的队列。

use tracing::info;

use crate::config::ScenarioConfig;
use crate::error::ConfigError;
use crate::monitor::{QueueSampler, SamplerId};
use crate::net::{Address, LinkId, NetWorld, PacketSink};
use crate::random::SeedSource;
use crate::relay::{ActiveWindow, RelayApp, RelayBias, RelayDecision};
use crate::sim::{SimTime, Simulator};
use crate::topo::relay::{RelayTopo, RelayTopoOpts, SOURCE_HOSTS, build_relay_topology};
use crate::traffic::SourceId;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub topo: RelayTopo,
    /// 中继监听地址
    pub relay: Address,
    /// Primary 路径的目的地址
    pub downstream: Address,
    pub monitored: Vec<LinkId>,
    pub sampler: SamplerId,
    pub sources: Vec<SourceId>,
    pub stop: SimTime,
}

impl Scenario {
    /// 校验配置、构建拓扑并调度所有初始事件。任何配置错误都在调度之前返回。
    pub fn setup(
        cfg: &ScenarioConfig,
        sim: &mut Simulator,
        world: &mut NetWorld,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        if let Some(bad) = cfg
            .sources
            .iter()
            .find(|s| !SOURCE_HOSTS.contains(&s.host.as_str()))
        {
            return Err(ConfigError::UnknownHost(bad.host.clone()));
        }
        let bias = RelayBias::new(cfg.relay.bias)?;
        let stop = SimTime::from_secs_f64(cfg.stop_s);
        let mut sampler = QueueSampler::new(
            Vec::new(),
            SimTime::from_secs_f64(cfg.sampling.period_s),
            SimTime::from_secs_f64(cfg.sampling.start_s),
            SimTime::from_secs_f64(cfg.sampling_end_s()),
        )?;

        let topo = build_relay_topology(
            world,
            &RelayTopoOpts {
                device_queue_pkts: cfg.device_queue_pkts,
                server_queue_pkts: cfg.queue_pkts,
                ..RelayTopoOpts::default()
            },
        );
        let mut seeds = SeedSource::new(cfg.seed);

        // 中继：primary 套接字 connect 到下游，secondary 用于回送
        let relay = Address::new(topo.server, cfg.relay.port);
        let downstream = Address::new(topo.router, cfg.relay.port);
        let primary = world.net.create_socket(topo.server);
        world.net.connect_socket(primary, downstream);
        let secondary = world.net.create_socket(topo.server);
        let app = RelayApp::new(0, bias, RelayDecision::new(seeds.next_seed()), primary, secondary)
            .with_window(ActiveWindow {
                start: SimTime::from_secs_f64(cfg.relay.start_s),
                stop: SimTime::from_secs_f64(cfg.relay.stop_s),
            });
        world.net.listen(relay, Box::new(app));
        world.net.listen(downstream, Box::new(PacketSink::default()));

        let mut sources = Vec::with_capacity(cfg.sources.len());
        for sc in &cfg.sources {
            let node = topo
                .host(&sc.host)
                .ok_or_else(|| ConfigError::UnknownHost(sc.host.clone()))?;
            let size = seeds.process(sc.size);
            let interval = seeds.process(sc.interval);
            let id = world.add_source(node, relay, size, interval);
            world.start_source(id, SimTime::from_secs_f64(sc.start_s), sim);
            sources.push(id);
        }

        let monitored = vec![topo.server_links.0, topo.server_links.1];
        for &q in &monitored {
            sampler.monitor(q);
        }
        let sampler = world.add_sampler(sampler, sim);

        sim.stop_at(stop);
        info!(
            sources = sources.len(),
            bias = bias.get(),
            stop = ?stop,
            seed = cfg.seed,
            "场景已建立"
        );

        Ok(Self {
            topo,
            relay,
            downstream,
            monitored,
            sampler,
            sources,
            stop,
        })
    }

    /// 运行到停止时间
    pub fn run(&self, sim: &mut Simulator, world: &mut NetWorld) {
        sim.run(world);
    }

    pub fn relay_app<'a>(&self, world: &'a NetWorld) -> Option<&'a RelayApp> {
        world.net.listener::<RelayApp>(self.relay)
    }
}
