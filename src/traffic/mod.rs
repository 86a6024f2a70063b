//! 随机流量源
//!
//! 更新过程：每次激活按包长分布发送一个包，再按间隔分布重新调度自己。

mod fire;
mod source;

pub use fire::FireSource;
pub use source::{SourceId, TrafficSource};
