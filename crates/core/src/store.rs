//! Per-scenario scratch store.
//!
//! Values produced by one step (a token, a registered user) are captured under
//! a name and read back by later steps of the same scenario. A store is created
//! empty for every scenario and dropped with it.
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::HarnessError;

#[derive(Debug, Default)]
pub struct Aliases {
    values: HashMap<String, Value>,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing an earlier capture.
    pub fn capture(&mut self, name: &str, value: impl Serialize) -> Result<(), HarnessError> {
        let value = serde_json::to_value(value)?;
        trace!(alias = name, "Captured alias");
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, HarnessError> {
        let value = self.raw(name)?;
        serde_json::from_value(value.clone()).map_err(|_| HarnessError::AliasType {
            name: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
    }

    pub fn str(&self, name: &str) -> Result<&str, HarnessError> {
        self.raw(name)?
            .as_str()
            .ok_or_else(|| HarnessError::AliasType {
                name: name.to_string(),
                expected: "a string".to_string(),
            })
    }

    pub fn raw(&self, name: &str) -> Result<&Value, HarnessError> {
        self.values
            .get(name)
            .ok_or_else(|| HarnessError::MissingAlias(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
