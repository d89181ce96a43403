//! Lookup addresses derived from the actor and session.

use mnemos_rs_config::{ACTOR_PLACEHOLDER, MemoryConfig, SESSION_PLACEHOLDER};

/// Identity of the conversation whose memory is being read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryScope {
    /// Memory resource identifier in the store.
    pub memory_id: String,
    /// Actor (end user) identifier.
    pub actor_id: String,
    /// Session identifier.
    pub session_id: String,
}

impl MemoryScope {
    pub fn new(
        memory_id: impl Into<String>,
        actor_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            memory_id: memory_id.into(),
            actor_id: actor_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Short-term event stream for one session, with its result bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StmAddress {
    pub memory_id: String,
    pub actor_id: String,
    pub session_id: String,
    pub max_results: usize,
}

/// Long-term namespace inside a memory resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceAddress {
    pub memory_id: String,
    pub namespace: String,
}

/// The four lookup addresses used for one retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryAddresses {
    pub stm: StmAddress,
    pub summary: NamespaceAddress,
    pub preference: NamespaceAddress,
    pub semantic: NamespaceAddress,
}

/// Derive every lookup address for `scope` from the memory config.
///
/// Pure: the same inputs always yield the same addresses, and nothing is cached.
pub fn resolve(scope: &MemoryScope, memory: &MemoryConfig) -> MemoryAddresses {
    let namespace = |template: &str| NamespaceAddress {
        memory_id: scope.memory_id.clone(),
        namespace: render_namespace(template, &scope.actor_id, &scope.session_id),
    };
    MemoryAddresses {
        stm: StmAddress {
            memory_id: scope.memory_id.clone(),
            actor_id: scope.actor_id.clone(),
            session_id: scope.session_id.clone(),
            max_results: memory.stm_max_results,
        },
        summary: namespace(&memory.namespaces.summary),
        preference: namespace(&memory.namespaces.preference),
        semantic: namespace(&memory.namespaces.semantic),
    }
}

/// Substitute `{actorId}` and `{sessionId}` in a namespace template.
pub fn render_namespace(template: &str, actor_id: &str, session_id: &str) -> String {
    template
        .replace(ACTOR_PLACEHOLDER, actor_id)
        .replace(SESSION_PLACEHOLDER, session_id)
}
