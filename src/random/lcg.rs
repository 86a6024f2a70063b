//! 线性同余生成器（LCG）
//!
//! 用于与 ChaCha 生成器做分布对比：`x_{n+1} = (a * x_n + c) mod m`，输出 `x / m`。

/// 线性同余生成器；输出落在 `[0, 1)`。
#[derive(Debug, Clone)]
pub struct Lcg {
    a: u64,
    c: u64,
    m: u64,
    state: u64,
}

impl Lcg {
    /// `m` 为 0 时按 1 处理（输出恒为 0）。
    pub fn new(a: u64, c: u64, m: u64, seed: u64) -> Self {
        let m = m.max(1);
        Self {
            a,
            c,
            m,
            state: seed % m,
        }
    }

    pub fn next_unit(&mut self) -> f64 {
        let next = (self.a as u128 * self.state as u128 + self.c as u128) % self.m as u128;
        self.state = next as u64;
        self.state as f64 / self.m as f64
    }
}

impl Iterator for Lcg {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_unit())
    }
}

/// 逆变换：把 `[0,1)` 上的均匀数映射成速率为 `lambda` 的指数间隔 `-ln(u)/lambda`。
///
/// `u == 0` 时结果为正无穷，保持原样交给调用方处理。
pub fn poisson_gaps(uniforms: impl IntoIterator<Item = f64>, lambda: f64) -> Vec<f64> {
    uniforms.into_iter().map(|u| -u.ln() / lambda).collect()
}
