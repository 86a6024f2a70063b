//! 最短跳数路由
//!
//! 为每个 (from, dst) 预计算最短路径上的下一跳。存在多个等价下一跳时，
//! 固定选择编号最小的节点。

use std::collections::{HashMap, VecDeque};

use super::id::NodeId;

#[derive(Debug, Clone)]
pub struct RoutingTable {
    dirty: bool,
    /// (from, dst) -> 下一跳
    next_hop: HashMap<(NodeId, NodeId), NodeId>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            dirty: true,
            next_hop: HashMap::new(),
        }
    }
}

impl RoutingTable {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 确保路由表基于当前拓扑是最新的。
    ///
    /// `adj[from]` 为从 `from` 出发的所有出边邻居；
    /// `rev_adj[to]` 为所有能到达 `to` 的前驱节点集合。
    pub fn ensure_built(&mut self, adj: &[Vec<NodeId>], rev_adj: &[Vec<NodeId>]) {
        if !self.dirty {
            return;
        }

        let n = adj.len();
        self.next_hop.clear();

        // 对每个 dst 在反向图上做 BFS，得到到 dst 的最短跳数距离 dist[*]。
        // 然后对每个 from，在满足 dist[next] = dist[from] - 1 的邻居中取编号最小者。
        let mut dist: Vec<u32> = vec![u32::MAX; n];
        let mut q: VecDeque<NodeId> = VecDeque::new();

        for dst_idx in 0..n {
            dist.fill(u32::MAX);
            q.clear();

            dist[dst_idx] = 0;
            q.push_back(NodeId(dst_idx));

            while let Some(v) = q.pop_front() {
                let dv = dist[v.0];
                for &pred in &rev_adj[v.0] {
                    if dist[pred.0] == u32::MAX {
                        dist[pred.0] = dv.saturating_add(1);
                        q.push_back(pred);
                    }
                }
            }

            for from_idx in 0..n {
                if from_idx == dst_idx {
                    continue;
                }
                let df = dist[from_idx];
                if df == u32::MAX {
                    continue; // unreachable
                }
                let best = adj[from_idx]
                    .iter()
                    .copied()
                    .filter(|nh| dist[nh.0] == df - 1)
                    .min();
                if let Some(nh) = best {
                    self.next_hop.insert((NodeId(from_idx), NodeId(dst_idx)), nh);
                }
            }
        }

        self.dirty = false;
    }

    /// 获取 (from, dst) 的下一跳
    pub fn next_hop(&self, from: NodeId, dst: NodeId) -> Option<NodeId> {
        self.next_hop.get(&(from, dst)).copied()
    }
}
