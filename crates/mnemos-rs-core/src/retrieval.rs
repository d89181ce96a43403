//! Concurrent fan-out of the four memory lookups.

use crate::compose::MemoryCategory;
use crate::error::MnemosCoreError;
use crate::namespace::{MemoryAddresses, NamespaceAddress};
use log::debug;
use mnemos_rs_memory::{EventRecord, MemoryError, MemoryRecord, MemoryStore};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

/// Raw results of one retrieval, one collection per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievedMemory {
    pub stm_events: Vec<EventRecord>,
    pub summary: Vec<MemoryRecord>,
    pub preference: Vec<MemoryRecord>,
    pub semantic: Vec<MemoryRecord>,
}

/// Run the short-term listing and the three long-term lookups concurrently.
///
/// Each lookup runs on its own task and all four are awaited before any
/// result is inspected, so a fast failure never hides a slower category's
/// completion. The first error in category order fails the whole retrieval.
/// Dropping the returned future abandons in-flight lookups without
/// cancelling them.
pub async fn retrieve_all(
    store: &Arc<dyn MemoryStore>,
    query: &str,
    addresses: &MemoryAddresses,
) -> Result<RetrievedMemory, MnemosCoreError> {
    let stm = {
        let store = Arc::clone(store);
        let address = addresses.stm.clone();
        tokio::spawn(async move {
            debug!(
                "listing recent events (session_id={}, max_results={})",
                address.session_id, address.max_results
            );
            store
                .list_events(
                    &address.memory_id,
                    &address.actor_id,
                    &address.session_id,
                    address.max_results,
                )
                .await
        })
    };
    let summary = spawn_lookup(store, &addresses.summary, query, MemoryCategory::Summary);
    let preference = spawn_lookup(
        store,
        &addresses.preference,
        query,
        MemoryCategory::Preference,
    );
    let semantic = spawn_lookup(store, &addresses.semantic, query, MemoryCategory::Semantic);

    let (stm, summary, preference, semantic) = tokio::join!(stm, summary, preference, semantic);

    let memory = RetrievedMemory {
        stm_events: joined(stm, MemoryCategory::RecentConversation)?,
        summary: joined(summary, MemoryCategory::Summary)?,
        preference: joined(preference, MemoryCategory::Preference)?,
        semantic: joined(semantic, MemoryCategory::Semantic)?,
    };
    debug!(
        "retrieval complete (stm={}, summary={}, preference={}, semantic={})",
        memory.stm_events.len(),
        memory.summary.len(),
        memory.preference.len(),
        memory.semantic.len()
    );
    Ok(memory)
}

fn spawn_lookup(
    store: &Arc<dyn MemoryStore>,
    address: &NamespaceAddress,
    query: &str,
    category: MemoryCategory,
) -> JoinHandle<Result<Vec<MemoryRecord>, MemoryError>> {
    let store = Arc::clone(store);
    let address = address.clone();
    let query = query.to_string();
    tokio::spawn(async move {
        debug!(
            "retrieving {} records (namespace={})",
            category.label(),
            address.namespace
        );
        store
            .retrieve_records(&address.memory_id, &address.namespace, &query)
            .await
    })
}

fn joined<T>(
    result: Result<Result<T, MemoryError>, JoinError>,
    category: MemoryCategory,
) -> Result<T, MnemosCoreError> {
    match result {
        Ok(inner) => Ok(inner?),
        Err(err) => Err(MnemosCoreError::Task(format!(
            "{} lookup did not complete: {err}",
            category.label()
        ))),
    }
}
