//! Command implementations.

pub mod ask;
pub mod chat;
pub mod config;
pub mod extract;
pub mod show;

pub use self::ask::execute_ask;
pub use self::chat::execute_chat;
pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::show::execute_show;

use crate::cli::ProviderArgs;
use crate::error::Result;
use scriptmind_domain::MemorySet;
use scriptmind_llm::{Provider, ProviderConfig};
use scriptmind_store::JsonFileStore;
use std::fs;
use std::path::Path;

/// Apply command-line provider overrides to the configured provider.
pub fn provider_config(base: &ProviderConfig, args: &ProviderArgs) -> ProviderConfig {
    let mut config = base.clone();
    if let Some(kind) = args.provider {
        config.kind = kind.into();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(api_key) = &args.api_key {
        config.api_key = Some(api_key.clone());
    }
    config
}

/// Build the provider selected by configuration and flags.
pub fn build_provider(base: &ProviderConfig, args: &ProviderArgs) -> Result<Provider> {
    Ok(Provider::from_config(&provider_config(base, args))?)
}

/// Read a script and the memories extracted from it.
pub fn load_context(memories: &Path, script: &Path) -> Result<(String, MemorySet)> {
    let document = JsonFileStore::load_document(memories)?;
    let script = fs::read_to_string(script)?;
    Ok((script, document.memories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProviderArg;
    use scriptmind_llm::ProviderKind;

    #[test]
    fn test_flags_override_file_values() {
        let base = ProviderConfig {
            model: "llama3".to_string(),
            api_key: Some("from-file".to_string()),
            ..ProviderConfig::default()
        };
        let args = ProviderArgs {
            provider: Some(ProviderArg::Openai),
            model: Some("gpt-4o-mini".to_string()),
            endpoint: None,
            api_key: Some("from-env".to_string()),
        };

        let config = provider_config(&base, &args);
        assert_eq!(config.kind, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.endpoint, None);
        assert_eq!(config.timeout_secs, base.timeout_secs);
    }

    #[test]
    fn test_no_flags_keeps_file_values() {
        let base = ProviderConfig::default();
        assert_eq!(provider_config(&base, &ProviderArgs::default()), base);
    }

    #[test]
    fn test_openai_without_key_is_rejected() {
        let args = ProviderArgs {
            provider: Some(ProviderArg::Openai),
            ..ProviderArgs::default()
        };
        assert!(build_provider(&ProviderConfig::default(), &args).is_err());
    }
}
