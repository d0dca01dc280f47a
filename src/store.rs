//! Parameter store: the current `ParameterSet` plus change notification.
//!
//! The store performs no validation. Parsing and range limits belong to the
//! front-end; domain checks belong to the evaluator.

use crate::domain::{ParamField, ParameterSet};

/// Callback fired after every update with the new full parameter set.
pub type Listener = Box<dyn FnMut(&ParameterSet)>;

pub struct ParameterStore {
    params: ParameterSet,
    listeners: Vec<Listener>,
}

impl ParameterStore {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            listeners: Vec::new(),
        }
    }

    /// Current parameters (by value).
    pub fn get(&self) -> ParameterSet {
        self.params
    }

    /// Register a listener. Listeners run synchronously, in registration order.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ParameterSet) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replace one field, then notify every listener.
    ///
    /// Returns the new parameter set.
    pub fn update(&mut self, field: ParamField, value: f64) -> ParameterSet {
        self.params = self.params.with_field(field, value);
        for listener in self.listeners.iter_mut() {
            listener(&self.params);
        }
        self.params
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParameterSet::default())
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("params", &self.params)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
