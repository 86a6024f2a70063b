//! 仿真核心模块
//!
//! 离散事件调度：虚拟时间、事件、世界和仿真器。

mod event;
mod simulator;
mod time;

pub use event::{Event, EventId, World};
pub use simulator::Simulator;
pub use time::SimTime;
