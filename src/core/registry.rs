use crate::adapters::SourceAdapter;
use crate::models::AnalysisClass;
use std::collections::HashMap;
use std::sync::Arc;

/// Adapters in registration order, which is also their invocation order.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    adapters_by_id: HashMap<String, Arc<dyn SourceAdapter>>,
    adapters_by_class: HashMap<AnalysisClass, Vec<Arc<dyn SourceAdapter>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
            adapters_by_id: HashMap::new(),
            adapters_by_class: HashMap::new(),
        }
    }

    /// Re-registering an id replaces the earlier adapter.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        let id = adapter.id().to_string();
        let class = adapter.class();

        if self.adapters_by_id.contains_key(&id) {
            for list in std::iter::once(&mut self.adapters)
                .chain(self.adapters_by_class.values_mut())
            {
                list.retain(|existing| existing.id() != id);
            }
        }

        self.adapters.push(adapter.clone());
        self.adapters_by_id.insert(id, adapter.clone());
        self.adapters_by_class.entry(class).or_default().push(adapter);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters_by_id.get(id).cloned()
    }

    pub fn get_by_class(&self, class: AnalysisClass) -> Vec<Arc<dyn SourceAdapter>> {
        self.adapters_by_class
            .get(&class)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_all(&self) -> Vec<Arc<dyn SourceAdapter>> {
        self.adapters.clone()
    }

    pub fn count(&self) -> usize {
        self.adapters.len()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
