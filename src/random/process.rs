//! 随机过程：分布 + 独立生成器状态

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{trace, warn};

use super::distribution::{Distribution, MAX_REJECTION_RETRIES};

/// 惰性、无限、不可重启的抽样序列。
///
/// 每次抽样只推进内部生成器状态；除非显式调用 [`RandomProcess::reseed`]，
/// 运行期间不会重置。
#[derive(Debug, Clone)]
pub struct RandomProcess {
    dist: Distribution,
    rng: ChaCha8Rng,
    draws: u64,
}

impl RandomProcess {
    /// 分布需已通过 [`Distribution::validate`]。
    pub fn new(dist: Distribution, seed: u64) -> Self {
        Self {
            dist,
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    pub fn distribution(&self) -> &Distribution {
        &self.dist
    }

    /// 已产生的抽样数
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// 显式重设种子（仅在调用方明确要求时使用）。
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// `(0, 1]` 上的均匀抽样，避免 `ln(0)`。
    fn unit_open_closed(&mut self) -> f64 {
        1.0 - self.rng.r#gen::<f64>()
    }

    pub fn sample(&mut self) -> f64 {
        self.draws = self.draws.wrapping_add(1);
        match self.dist {
            Distribution::Uniform { min, max } => {
                let u: f64 = self.rng.r#gen();
                min + u * (max - min)
            }
            Distribution::Exponential { mean, bound: None } => {
                -self.unit_open_closed().ln() * mean
            }
            Distribution::Exponential {
                mean,
                bound: Some(bound),
            } => {
                for attempt in 0..MAX_REJECTION_RETRIES {
                    let v = -self.unit_open_closed().ln() * mean;
                    if v <= bound {
                        if attempt > 0 {
                            trace!(attempt, "有界指数抽样重抽后接受");
                        }
                        return v;
                    }
                }
                warn!(mean, bound, "有界指数抽样重抽次数耗尽，返回上界");
                bound
            }
        }
    }

    /// `sample()` 向零截断；负数或 NaN 视为 0。
    pub fn sample_int(&mut self) -> u64 {
        let v = self.sample();
        if v > 0.0 { v.trunc() as u64 } else { 0 }
    }
}

impl Iterator for RandomProcess {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.sample())
    }
}

/// 从主种子派生每个随机过程的独立种子。
#[derive(Debug, Clone)]
pub struct SeedSource {
    seeder: ChaCha8Rng,
}

impl SeedSource {
    pub fn new(master: u64) -> Self {
        Self {
            seeder: ChaCha8Rng::seed_from_u64(master),
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        self.seeder.next_u64()
    }

    /// 用下一个派生种子创建随机过程
    pub fn process(&mut self, dist: Distribution) -> RandomProcess {
        RandomProcess::new(dist, self.next_seed())
    }
}
