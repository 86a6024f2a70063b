//! 拓扑构建

pub mod line;
pub mod relay;
