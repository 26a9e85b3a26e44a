mod manager;

pub use manager::{
    ConfigFile, ConfigManager, MdtlConfig, ProviderConfig, ResolveOptions, ResolvedConfig,
    resolve_config,
};
