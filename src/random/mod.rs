//! 随机过程
//!
//! 每个 [`RandomProcess`] 持有独立、可设定种子的生成器，保证同一种子下的抽样序列
//! 完全可复现，且不同过程之间互不干扰。

mod distribution;
mod lcg;
mod process;

pub use distribution::{Distribution, MAX_REJECTION_RETRIES};
pub use lcg::{Lcg, poisson_gaps};
pub use process::{RandomProcess, SeedSource};
