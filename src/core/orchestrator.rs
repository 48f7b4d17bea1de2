use crate::adapters::dynamic_analysis::{BurpAdapter, DeviceAutomationAdapter, ZapAdapter};
use crate::adapters::static_analysis::{AndroguardAdapter, MobsfAdapter, QarkAdapter};
use crate::adapters::SourceAdapter;
use crate::config::Config;
use crate::core::error::ScanError;
use crate::core::fallback::FallbackSource;
use crate::core::registry::AdapterRegistry;
use crate::models::{AnalysisClass, Finding};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Runs every registered adapter of one analysis class against a target
/// and merges their findings.
pub struct Orchestrator {
    registry: AdapterRegistry,
    static_fallback: FallbackSource,
    dynamic_fallback: FallbackSource,
    config: Config,
}

impl Orchestrator {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: AdapterRegistry::new(),
            static_fallback: FallbackSource::new(config.fallback.static_sample.clone()),
            dynamic_fallback: FallbackSource::new(config.fallback.dynamic_sample.clone()),
            config: config.clone(),
        }
    }

    pub fn register_adapter(&mut self, adapter: Arc<dyn SourceAdapter>) {
        if self
            .config
            .exclude_adapters
            .iter()
            .any(|id| id == adapter.id())
        {
            debug!(adapter = adapter.id(), "Adapter excluded by config");
            return;
        }
        self.registry.register(adapter);
    }

    /// Built-ins in invocation order.
    pub fn register_built_in_adapters(&mut self) {
        // Static
        self.register_adapter(Arc::new(MobsfAdapter::from_config(&self.config.remote)));
        self.register_adapter(Arc::new(AndroguardAdapter));
        self.register_adapter(Arc::new(QarkAdapter));

        // Dynamic
        self.register_adapter(Arc::new(ZapAdapter));
        self.register_adapter(Arc::new(BurpAdapter));
        self.register_adapter(Arc::new(DeviceAutomationAdapter::from_config(
            &self.config.device,
        )));
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    fn fallback(&self, class: AnalysisClass) -> &FallbackSource {
        match class {
            AnalysisClass::Static => &self.static_fallback,
            AnalysisClass::Dynamic => &self.dynamic_fallback,
        }
    }

    /// Findings keep adapter order, then in-adapter order. Duplicates
    /// across adapters are kept. When nothing at all comes back, the
    /// class's fallback sample is used (possibly empty).
    ///
    /// Only a missing target is an error.
    #[instrument(skip(self, target), fields(target = %target.display()))]
    pub async fn run_analysis(
        &self,
        class: AnalysisClass,
        target: &Path,
    ) -> Result<Vec<Finding>, ScanError> {
        if target.as_os_str().is_empty() || !target.is_file() {
            return Err(ScanError::MissingTarget(target.to_path_buf()));
        }

        let mut findings = Vec::new();
        for adapter in self.registry.get_by_class(class) {
            let contributed = adapter.findings(target).await;
            debug!(adapter = adapter.id(), count = contributed.len(), "Adapter finished");
            findings.extend(contributed);
        }

        if findings.is_empty() {
            let fallback = self.fallback(class);
            findings = fallback.load();
            info!(
                class = %class,
                sample = ?fallback.path(),
                count = findings.len(),
                "No adapter findings, using fallback sample"
            );
        }

        info!(class = %class, count = findings.len(), "Analysis complete");
        Ok(findings)
    }
}
