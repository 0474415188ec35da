// ABOUTME: Tool module - the tool catalog, descriptors, registry, and results.
// ABOUTME: Read-only data shared by the dispatcher and the MCP server.

mod catalog;
mod descriptor;
mod registry;
mod result;

pub use catalog::*;
pub use descriptor::*;
pub use registry::*;
pub use result::*;

#[cfg(test)]
mod result_test;
