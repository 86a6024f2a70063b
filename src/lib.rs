pub mod config;
pub mod error;
pub mod flow;
pub mod monitor;
pub mod net;
pub mod queue;
pub mod random;
pub mod relay;
pub mod scenario;
pub mod sim;
pub mod topo;
pub mod traffic;

#[cfg(test)]
mod test;
