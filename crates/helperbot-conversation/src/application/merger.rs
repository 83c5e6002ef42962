//! Schema migration on read.
//!
//! Every inbound event starts here: the stored record is read, missing
//! fields are filled from defaults, and the complete record is written back
//! before any command runs.

use helperbot_core::config::Config;
use helperbot_core::conversation::ConversationKey;
use helperbot_core::error::DomainError;
use helperbot_core::store::ConversationStore;
use tracing::debug;

use super::context::ConversationContext;

/// Loads the stored config, fills defaults, and writes the merged record back.
///
/// The write happens even when nothing was missing.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store cannot be read or written.
pub async fn load_merged(
    key: &ConversationKey,
    store: &dyn ConversationStore,
) -> Result<Config, DomainError> {
    let stored = store.load(key).await?;
    let config = stored.merge_with_defaults();
    store.replace(key, &config).await?;
    debug!(conversation = %key, "merged conversation config");
    Ok(config)
}

/// Loads and merges the config, returning a context for further updates.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store cannot be read or written.
pub async fn open<'a>(
    key: &ConversationKey,
    store: &'a dyn ConversationStore,
) -> Result<ConversationContext<'a>, DomainError> {
    let config = load_merged(key, store).await?;
    Ok(ConversationContext::new(key.clone(), config, store))
}
