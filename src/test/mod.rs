mod flow_recorder;
mod queues;
mod scenario;
mod traffic_source;
