pub mod cors;
pub mod permission_gate;
pub mod request_trace;
pub mod structured_logger;
