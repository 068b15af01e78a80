//! Web-boundary helpers that must not leak into core/service code.

pub mod trace_ctx;
