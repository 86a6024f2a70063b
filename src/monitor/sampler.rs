//! 采样器与采样事件

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::net::{LinkId, NetWorld};
use crate::sim::{Event, EventId, SimTime, Simulator, World};

/// 只读的队列深度探针；队列已不存在时返回 None。
pub trait QueueProbe {
    fn queue_depth(&self, queue: LinkId) -> Option<u32>;
}

/// 一次观测
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSample {
    /// 计划采样时刻（虚拟时间）
    pub time: SimTime,
    pub queue: LinkId,
    pub depth: u32,
}

impl QueueSample {
    pub fn timestamp_secs(&self) -> f64 {
        self.time.as_secs_f64()
    }
}

/// 采样器在 `NetWorld::samplers` 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerId(pub usize);

#[derive(Debug)]
pub struct QueueSampler {
    queues: Vec<LinkId>,
    period: SimTime,
    start: SimTime,
    end: SimTime,
    log: Vec<QueueSample>,
    pending: Vec<EventId>,
    /// 因队列不存在而跳过的 (时刻, 队列) 次数
    skipped: u64,
}

impl QueueSampler {
    /// 在 `[start, end)` 上每隔 `period` 采样一次。
    pub fn new(
        queues: Vec<LinkId>,
        period: SimTime,
        start: SimTime,
        end: SimTime,
    ) -> Result<Self, ConfigError> {
        if period == SimTime::ZERO {
            return Err(ConfigError::NonPositivePeriod(period.as_secs_f64()));
        }
        if end <= start {
            return Err(ConfigError::EmptyHorizon {
                start: start.as_secs_f64(),
                end: end.as_secs_f64(),
            });
        }
        Ok(Self {
            queues,
            period,
            start,
            end,
            log: Vec::new(),
            pending: Vec::new(),
            skipped: 0,
        })
    }

    /// 追加一个被监控的队列（应在 `schedule_all` 之前调用）
    pub fn monitor(&mut self, queue: LinkId) {
        if !self.queues.contains(&queue) {
            self.queues.push(queue);
        }
    }

    /// 全部采样时刻 `start + k*period < end`（整数纳秒，无累积误差）
    pub fn sample_times(&self) -> impl Iterator<Item = SimTime> + '_ {
        let (start, end, period) = (self.start.0, self.end.0, self.period.0);
        (0u64..)
            .map_while(move |k| {
                let t = k.checked_mul(period)?.checked_add(start)?;
                (t < end).then_some(SimTime(t))
            })
    }

    /// 预先枚举所有采样时刻，每个时刻独立调度一个事件（不是自我重调度的循环）。
    pub fn schedule_all(&mut self, id: SamplerId, sim: &mut Simulator) -> usize {
        let times: Vec<SimTime> = self.sample_times().collect();
        self.pending.reserve(times.len());
        for at in times {
            let ev = sim.schedule(at, SampleQueues { sampler: id });
            self.pending.push(ev);
        }
        debug!(
            sampler = id.0,
            ticks = self.pending.len(),
            queues = self.queues.len(),
            "采样事件已调度"
        );
        self.pending.len()
    }

    /// 撤回所有尚未执行的采样事件，返回撤回数量。
    pub fn cancel(&mut self, sim: &mut Simulator) -> usize {
        self.pending.drain(..).filter(|ev| sim.cancel(*ev)).count()
    }

    /// 在时刻 `now` 读取每个队列；不存在的队列本次跳过。
    pub fn sample(&mut self, now: SimTime, probe: &dyn QueueProbe) {
        for &queue in &self.queues {
            match probe.queue_depth(queue) {
                Some(depth) => self.log.push(QueueSample {
                    time: now,
                    queue,
                    depth,
                }),
                None => {
                    self.skipped += 1;
                    trace!(queue = ?queue, ?now, "队列不存在，跳过本次采样");
                }
            }
        }
    }

    pub fn queues(&self) -> &[LinkId] {
        &self.queues
    }

    pub fn samples(&self) -> &[QueueSample] {
        &self.log
    }

    /// 某一队列的全部观测
    pub fn samples_for(&self, queue: LinkId) -> impl Iterator<Item = &QueueSample> + '_ {
        self.log.iter().filter(move |s| s.queue == queue)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn max_depth(&self, queue: LinkId) -> Option<u32> {
        self.samples_for(queue).map(|s| s.depth).max()
    }

    pub fn mean_depth(&self, queue: LinkId) -> Option<f64> {
        let (n, sum) = self
            .samples_for(queue)
            .fold((0u64, 0u64), |(n, sum), s| (n + 1, sum + s.depth as u64));
        (n > 0).then(|| sum as f64 / n as f64)
    }
}

/// 事件：某个采样器的一次采样。
#[derive(Debug)]
pub struct SampleQueues {
    pub sampler: SamplerId,
}

impl Event for SampleQueues {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let SampleQueues { sampler } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        if let Some(s) = w.samplers.get_mut(sampler.0) {
            s.sample(sim.now(), &w.net);
        }
    }
}
