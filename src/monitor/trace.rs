//! 队列采样的文本输出
//!
//! 每行一个样本：`秒<TAB>深度`（每个队列一个文件），或交错格式
//! `秒<TAB>队列<TAB>深度`。

use std::io::{self, Write};

use super::sampler::QueueSample;
use crate::net::LinkId;

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueTraceWriter {
    /// 是否输出队列编号列
    pub with_queue_column: bool,
}

impl QueueTraceWriter {
    pub fn interleaved() -> Self {
        Self {
            with_queue_column: true,
        }
    }

    pub fn per_queue() -> Self {
        Self {
            with_queue_column: false,
        }
    }

    pub fn write_line<W: Write>(&self, out: &mut W, s: &QueueSample) -> io::Result<()> {
        if self.with_queue_column {
            writeln!(out, "{}\t{}\t{}", s.timestamp_secs(), s.queue.0, s.depth)
        } else {
            writeln!(out, "{}\t{}", s.timestamp_secs(), s.depth)
        }
    }

    /// 写出样本；`queue` 为 Some 时只写该队列。
    pub fn write_all<'a, W: Write>(
        &self,
        out: &mut W,
        samples: impl IntoIterator<Item = &'a QueueSample>,
        queue: Option<LinkId>,
    ) -> io::Result<usize> {
        let mut n = 0;
        for s in samples {
            if queue.is_some_and(|q| q != s.queue) {
                continue;
            }
            self.write_line(out, s)?;
            n += 1;
        }
        out.flush()?;
        Ok(n)
    }
}
