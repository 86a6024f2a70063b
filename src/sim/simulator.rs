//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use super::event::{Event, EventId, World};
use super::time::SimTime;
use tracing::{debug, info, trace};

/// 队列中的一项；堆顶是 (at, seq) 最小者。
struct ScheduledEvent {
    at: SimTime,
    seq: u64,
    ev: Box<dyn Event>,
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.at, other.seq).cmp(&(self.at, self.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        (self.at, self.seq) == (other.at, other.seq)
    }
}

impl Eq for ScheduledEvent {}

/// 事件驱动仿真器：维护当前时间与事件队列。
///
/// 同一时刻的事件按调度顺序（seq）执行；被取消的事件在出队时直接丢弃。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    live: HashSet<u64>,
    cancelled: HashSet<u64>,
    stop: Option<SimTime>,
    executed: u64,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 尚未执行且未被取消的事件数
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// 已执行的事件总数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 调度事件在指定时间执行；早于当前时间的请求按当前时间处理。
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) -> EventId {
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.live.insert(seq);
        self.q.push(ScheduledEvent {
            at: at.max(self.now),
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
        EventId(seq)
    }

    /// 调度事件在 `now + delay` 执行
    pub fn schedule_after<E: Event>(&mut self, delay: SimTime, ev: E) -> EventId {
        let at = self.now.saturating_add(delay);
        self.schedule(at, ev)
    }

    /// 取消一个尚未执行的事件。已执行或未知的句柄返回 false。
    pub fn cancel(&mut self, id: EventId) -> bool {
        if !self.live.remove(&id.0) {
            return false;
        }
        self.cancelled.insert(id.0)
    }

    /// 设置停止时间：`run` 不会执行时间 >= `at` 的事件。
    pub fn stop_at(&mut self, at: SimTime) {
        self.stop = Some(at);
    }

    /// 丢弃所有待执行事件。
    pub fn destroy(&mut self) {
        debug!(dropped = self.q.len(), "清空事件队列");
        self.q.clear();
        self.live.clear();
        self.cancelled.clear();
    }

    fn pop_live(&mut self) -> Option<ScheduledEvent> {
        while let Some(item) = self.q.pop() {
            if self.cancelled.remove(&item.seq) {
                trace!(seq = item.seq, "跳过已取消事件");
                continue;
            }
            self.live.remove(&item.seq);
            return Some(item);
        }
        None
    }

    fn peek_live_at(&mut self) -> Option<SimTime> {
        while let Some(top) = self.q.peek() {
            if self.cancelled.contains(&top.seq) {
                let seq = top.seq;
                self.q.pop();
                self.cancelled.remove(&seq);
                continue;
            }
            return Some(top.at);
        }
        None
    }

    fn step(&mut self, item: ScheduledEvent, world: &mut dyn World) {
        self.now = item.at;
        self.executed = self.executed.saturating_add(1);
        item.ev.execute(self, world);
        world.on_tick(self);
    }

    /// 运行直到事件队列为空或到达 `until`（含 `until` 时刻的事件）。
    ///
    /// 停止时间同样生效：时间 >= 停止时间的事件不执行，时钟最多推进到停止时间。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while let Some(at) = self.peek_live_at() {
            if at > until || self.stop.is_some_and(|stop| at >= stop) {
                break;
            }
            if let Some(item) = self.pop_live() {
                self.step(item, world);
            }
        }
        let end = self.stop.map_or(until, |stop| until.min(stop));
        self.now = self.now.max(end);
    }

    /// 运行所有事件直到队列为空；若设置了停止时间，则只执行早于停止时间的事件，
    /// 之后的事件留在队列中不再执行。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!(stop = ?self.stop, "▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let start_count = self.executed;
        while let Some(at) = self.peek_live_at() {
            if self.stop.is_some_and(|stop| at >= stop) {
                break;
            }
            let Some(item) = self.pop_live() else { break };

            trace!(
                now = ?item.at,
                seq = item.seq,
                remaining_queue = self.q.len(),
                "执行事件"
            );
            self.step(item, world);
        }
        if let Some(stop) = self.stop {
            self.now = self.now.max(stop);
        }

        info!(
            total_events = self.executed - start_count,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
    }
}
