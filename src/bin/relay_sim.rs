//! 概率中继仿真
//!
//! 四个指数流量源发往中继服务器，中继按偏置把包转发到下游或回送原发送方；
//! 每 1 ms 采样网关到服务器的队列深度，结束后输出每条流的统计。

use clap::Parser;
use relaysim_rs::config::ScenarioConfig;
use relaysim_rs::flow::{DropCause, FlowReport};
use relaysim_rs::monitor::QueueTraceWriter;
use relaysim_rs::net::NetWorld;
use relaysim_rs::scenario::Scenario;
use relaysim_rs::sim::Simulator;
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "relay_sim", about = "概率中继仿真：指数流量源 + 偏置转发 + 队列采样")]
struct Args {
    /// 场景 JSON 文件；不填则使用内置缺省场景
    #[arg(long)]
    config: Option<PathBuf>,

    /// 主种子（覆盖配置文件）
    #[arg(long)]
    seed: Option<u64>,

    /// 停止时间（秒）
    #[arg(long)]
    stop_s: Option<f64>,

    /// 网关到服务器的队列容量（包）
    #[arg(long)]
    queue_pkts: Option<u32>,

    /// 中继选择下游路径的概率，开区间 (0, 1)
    #[arg(long)]
    bias: Option<f64>,

    /// 采样间隔（秒）
    #[arg(long)]
    sample_period_s: Option<f64>,

    /// 队列采样输出文件（每行 `秒<TAB>队列<TAB>深度`）
    #[arg(long, default_value = "queue.tr")]
    queue_trace: PathBuf,

    /// 输出流统计 JSON；不填则不生成
    #[arg(long)]
    flow_json: Option<PathBuf>,
}

fn fmt_rate(bps: Option<f64>) -> String {
    match bps {
        Some(v) => format!("{:.6} Mbps", v / 1e6),
        None => "undefined".to_string(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).expect("read scenario config");
            match serde_json::from_str::<ScenarioConfig>(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("invalid configuration: {}: {e}", path.display());
                    return ExitCode::from(2);
                }
            }
        }
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(stop) = args.stop_s {
        cfg.stop_s = stop;
    }
    if let Some(q) = args.queue_pkts {
        cfg.queue_pkts = q;
    }
    if let Some(bias) = args.bias {
        cfg.relay.bias = bias;
    }
    if let Some(period) = args.sample_period_s {
        cfg.sampling.period_s = period;
    }

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();

    let scenario = match Scenario::setup(&cfg, &mut sim, &mut world) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    scenario.run(&mut sim, &mut world);

    let sampler = world
        .sampler(scenario.sampler)
        .expect("scenario sampler registered");
    let file = fs::File::create(&args.queue_trace).expect("create queue trace");
    let lines = QueueTraceWriter::interleaved()
        .write_all(&mut BufWriter::new(file), sampler.samples(), None)
        .expect("write queue trace");
    eprintln!(
        "wrote {lines} queue samples to {}",
        args.queue_trace.display()
    );

    println!("done @ {:?}, events={}", sim.now(), sim.executed());
    if let Some(relay) = scenario.relay_app(&world) {
        println!(
            "relay primary={} secondary={} ignored={}",
            relay.primary_count, relay.secondary_count, relay.ignored
        );
    }
    for &q in &scenario.monitored {
        println!(
            "queue {} max_depth={} mean_depth={:.3}",
            q.0,
            sampler.max_depth(q).unwrap_or(0),
            sampler.mean_depth(q).unwrap_or(0.0)
        );
    }

    for (id, key, c) in world.net.flows.iter() {
        let qd = c.dropped_by(DropCause::QueueOverflow);
        println!("flow {} ({key})", id.0);
        println!("  Tx Packets/Bytes:   {} / {}", c.tx_packets, c.tx_bytes);
        println!("  Offered Load: {}", fmt_rate(c.offered_load_bps()));
        println!("  Rx Packets/Bytes:   {} / {}", c.rx_packets, c.rx_bytes);
        println!("  Packets/Bytes Dropped by Queue:   {} / {}", qd.packets, qd.bytes);
        println!("  Packets Dropped (all causes):   {}", c.dropped_packets());
        println!("  Throughput: {}", fmt_rate(c.throughput_bps()));
    }

    if let Some(path) = args.flow_json {
        let reports = FlowReport::collect(&world.net.flows);
        let json = serde_json::to_string_pretty(&reports).expect("serialize flow stats");
        fs::write(&path, json).expect("write flow json");
        eprintln!("wrote flow stats to {}", path.display());
    }

    ExitCode::SUCCESS
}
