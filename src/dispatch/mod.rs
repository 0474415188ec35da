// ABOUTME: Dispatch module - maps tool calls onto provider calls.
// ABOUTME: Holds the per-tool handlers and the Dispatcher entry point.

mod dispatcher;
mod handlers;

pub use dispatcher::*;
pub use handlers::*;

#[cfg(test)]
mod dispatcher_test;
