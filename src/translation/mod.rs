//! Translation provider interface, DeepL client, and language tables.

mod capability;
mod deepl;
mod provider;
mod registry;

pub use capability::{CapabilityLookup, CapabilityTable, DeepLCapabilities, LanguageCapability};
pub use deepl::{DeepLClient, FREE_ENDPOINT, PRO_ENDPOINT, Usage};
pub use provider::{Formality, ProviderFailure, ProviderOptions, TranslationProvider};
pub use registry::{display_language, language_name};
