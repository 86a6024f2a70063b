//! 随机数生成器抽样导出
//!
//! 每种生成器输出 CSV 的一行（逗号分隔），用于离线比较分布。

use clap::Parser;
use relaysim_rs::random::{Distribution, Lcg, RandomProcess, poisson_gaps};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "rng_samples", about = "导出 LCG / 均匀 / 指数抽样到 CSV")]
struct Args {
    /// 每种生成器的抽样数
    #[arg(long, default_value_t = 1000)]
    n: usize,

    #[arg(long, default_value_t = 0.0)]
    min: f64,
    #[arg(long, default_value_t = 1.0)]
    max: f64,

    /// 指数分布速率（LCG 逆变换使用）；有界指数抽样以它为均值参数
    #[arg(long, default_value_t = 3.14)]
    lambda: f64,
    /// 有界指数抽样的上界
    #[arg(long, default_value_t = 1.0)]
    bound: f64,

    /// LCG 参数
    #[arg(long, default_value_t = 13)]
    a: u64,
    #[arg(long, default_value_t = 1)]
    c: u64,
    #[arg(long, default_value_t = 100)]
    m: u64,
    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long)]
    lcg: bool,
    /// ChaCha 均匀抽样
    #[arg(long)]
    uniform: bool,
    /// LCG 均匀数经逆变换得到的指数间隔
    #[arg(long)]
    poisson: bool,
    /// 有界指数抽样
    #[arg(long)]
    bounded_exp: bool,
    #[arg(long)]
    all: bool,

    #[arg(long, default_value = "samples.csv")]
    out: PathBuf,
}

fn write_row<W: Write>(out: &mut W, row: &[f64]) -> std::io::Result<()> {
    let line = row
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "{line}")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = Args::parse();
    if args.all {
        args.lcg = true;
        args.uniform = true;
        args.poisson = true;
        args.bounded_exp = true;
    }

    let uniform = match Distribution::uniform(args.min, args.max) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };
    let bounded = match Distribution::exponential_bounded(args.lambda, args.bound) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let mut rows: Vec<Vec<f64>> = Vec::new();
    if args.lcg {
        rows.push(Lcg::new(args.a, args.c, args.m, args.seed).take(args.n).collect());
    }
    if args.uniform {
        rows.push(RandomProcess::new(uniform, args.seed).take(args.n).collect());
    }
    if args.poisson {
        let u = Lcg::new(args.a, args.c, args.m, args.seed).take(args.n);
        rows.push(poisson_gaps(u, args.lambda));
    }
    if args.bounded_exp {
        rows.push(RandomProcess::new(bounded, args.seed).take(args.n).collect());
    }

    let file = fs::File::create(&args.out).expect("create csv");
    let mut out = BufWriter::new(file);
    for row in &rows {
        write_row(&mut out, row).expect("write csv row");
    }
    out.flush().expect("flush csv");
    eprintln!("wrote {} rows to {}", rows.len(), args.out.display());

    ExitCode::SUCCESS
}
