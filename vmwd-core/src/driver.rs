//! VMware driver state.
//!
//! A [`Driver`] is the explicit context every operation runs against. It owns
//! the domain registry, the host capabilities and the VMX translator; dropping
//! it releases all of them.

use crate::capabilities::Capabilities;
use crate::config::DriverConfig;
use crate::error::Result;
use crate::reconcile::{self, ReconcileReport};
use crate::registry::DomainRegistry;
use crate::translator::ConfigTranslator;
use crate::types::{DomainDef, Flavor};
use crate::version::Version;
use crate::vmrun::VmrunTool;
use crate::vmx_path::vmx_path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

/// Per-connection VMware driver state.
pub struct Driver {
    config: DriverConfig,
    tool: VmrunTool,
    version: RwLock<Option<Version>>,
    registry: DomainRegistry,
    capabilities: Capabilities,
    translator: Arc<dyn ConfigTranslator>,
    /// Held for a whole reconciliation pass so passes never interleave.
    reconcile_guard: Mutex<()>,
}

impl Driver {
    /// Create a driver from a validated configuration.
    #[instrument(skip_all, fields(vmrun = %config.vmrun_path.display(), flavor = %config.flavor))]
    pub fn new(config: DriverConfig, translator: Arc<dyn ConfigTranslator>) -> Result<Self> {
        Self::with_capabilities(config, translator, Capabilities::probe())
    }

    /// Create a driver with explicitly provided capabilities.
    pub fn with_capabilities(
        config: DriverConfig,
        translator: Arc<dyn ConfigTranslator>,
        capabilities: Capabilities,
    ) -> Result<Self> {
        config.validate()?;

        let tool = VmrunTool::new(&config.vmrun_path, config.flavor, config.command_timeout());

        info!(translator = translator.name(), "VMware driver initialized");
        Ok(Self {
            config,
            tool,
            version: RwLock::new(None),
            registry: DomainRegistry::new(),
            capabilities,
            translator,
            reconcile_guard: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn flavor(&self) -> Flavor {
        self.config.flavor
    }

    pub fn tool(&self) -> &VmrunTool {
        &self.tool
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn translator(&self) -> &dyn ConfigTranslator {
        self.translator.as_ref()
    }

    /// Last detected product version, if any.
    pub async fn version(&self) -> Option<Version> {
        *self.version.read().await
    }

    /// Detect the product version and remember it.
    ///
    /// The companion binary runs without any lock held.
    pub async fn detect_version(&self) -> Result<Version> {
        let version = self.tool.version().await?;
        *self.version.write().await = Some(version);
        Ok(version)
    }

    /// Synchronize the registry with the VMs `vmrun` reports as running.
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let _guard = self.reconcile_guard.lock().await;
        reconcile::reconcile(self).await
    }

    /// Render `def` as VMX contents together with the path it should be written to.
    pub fn render_vmx(&self, def: &DomainDef) -> Result<(PathBuf, Vec<u8>)> {
        let path = vmx_path(def)?;
        let contents = self.translator.format(def)?;
        Ok((path, contents))
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("translator", &self.translator.name())
            .finish_non_exhaustive()
    }
}
