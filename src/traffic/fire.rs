//! 流量源激活事件

use super::source::SourceId;
use crate::net::NetWorld;
use crate::sim::{Event, Simulator, World};

/// 事件：触发某个流量源的一次激活。
#[derive(Debug)]
pub struct FireSource {
    pub source: SourceId,
}

impl Event for FireSource {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let FireSource { source } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        if let Some(src) = w.sources.get_mut(source.0) {
            src.fire(sim, &mut w.net);
        }
    }
}
