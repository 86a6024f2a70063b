//! 事件与世界
//!
//! 事件按值执行（`self: Box<Self>`）；世界由业务层实现，事件通过 `as_any_mut`
//! 向下转型拿到具体类型。

use std::any::Any;

use super::simulator::Simulator;

pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}

/// `Simulator::schedule` 返回的句柄，用于 `cancel`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

/// 被仿真的状态（拓扑、流量源、采样器等）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每执行完一个事件调用一次
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
