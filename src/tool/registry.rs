// ABOUTME: Implements the Registry - the read-only catalog of tool descriptors
// ABOUTME: built once at startup and shared by every request.

use std::collections::HashSet;
use std::sync::Arc;

use super::{ToolDefinition, ToolDescriptor, ToolKind};
use crate::error::RegistryError;

/// An ordered, immutable registry of tools.
#[derive(Debug, Clone)]
pub struct Registry {
    tools: Arc<[ToolDescriptor]>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// The registry of every tool this server exposes.
    pub fn builtin() -> Self {
        Self::from_descriptors(ToolKind::ALL.into_iter().map(ToolKind::descriptor).collect())
    }

    /// Create a registry from explicit descriptors, keeping their order.
    pub fn from_descriptors(tools: Vec<ToolDescriptor>) -> Self {
        Self {
            tools: tools.into(),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// All descriptors, in registration order.
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// All tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Get the number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Convert all tools to wire definitions.
    pub fn to_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::to_definition).collect()
    }

    /// Verify the catalog invariants: unique names, required parameters
    /// without defaults, and defaults that satisfy their own schema.
    pub fn check(&self) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for tool in self.tools.iter() {
            if !seen.insert(tool.name.as_str()) {
                return Err(RegistryError::DuplicateName(tool.name.clone()));
            }
            for param in &tool.params {
                match (&param.default, param.required) {
                    (Some(_), true) => {
                        return Err(RegistryError::RequiredWithDefault {
                            tool: tool.name.clone(),
                            param: param.name.clone(),
                        });
                    }
                    (Some(default), false) if !param.accepts(default) => {
                        return Err(RegistryError::InvalidDefault {
                            tool: tool.name.clone(),
                            param: param.name.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
