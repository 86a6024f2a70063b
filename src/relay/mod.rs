//! 概率中继
//!
//! 每个到达中继的包都按偏置概率在两条下游路径之间选一条，转发一个等长的新包。

mod app;
mod decision;

pub use app::{ActiveWindow, RelayApp};
pub use decision::{DEFAULT_RELAY_BIAS, Egress, RelayBias, RelayDecision};
