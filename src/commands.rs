pub mod batch;
pub mod resolve;
pub mod stats;

use anyhow::Result;
use geostore::GeoStore;
use tracing::info;

use crate::audit::JsonLinesAudit;
use crate::cli::EngineArgs;
use crate::config::ResolverConfig;
use crate::resolver::Resolver;
use crate::result::ResolutionResult;

/// Store, configuration and audit sink named by the engine options.
pub(crate) struct Engine {
    pub store: GeoStore,
    pub config: ResolverConfig,
    pub audit: Option<JsonLinesAudit>,
}

impl Engine {
    pub fn open(args: &EngineArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => ResolverConfig::from_path(path)?,
            None => ResolverConfig::default(),
        };
        let store = GeoStore::from_dir(&args.data)?;
        info!(
            streets = store.streets().len(),
            blocks = store.blocks().len(),
            buildings = store.buildings().len(),
            "loaded {}", args.data.display()
        );
        let audit = args.audit.as_deref().map(JsonLinesAudit::open).transpose()?;
        Ok(Self { store, config, audit })
    }

    /// Resolve `text`, recording it when an audit log is configured.
    pub fn resolve(&self, text: &str) -> ResolutionResult {
        let resolver = Resolver::new(&self.store, &self.config);
        match &self.audit {
            Some(audit) => resolver.resolve_and_record(text, audit),
            None => resolver.resolve(text),
        }
    }
}
