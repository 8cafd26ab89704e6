//! Insertion phases and the per-pass phase map.

use super::descriptor::ExtensionDescriptor;
use std::sync::Arc;

/// Coarse ordering category governing where an extension lands relative to
/// the anchor filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Before request authentication
    Authn,
    /// Before request authorization
    Authz,
    /// Before telemetry collection
    Stats,
    /// No stated preference; lands right before the router
    #[default]
    Unspecified,
}

impl Phase {
    /// Drain precedence at an anchor: an anchor drains a fixed prefix of this
    /// sequence up to and including its own rank.
    pub const DRAIN_ORDER: [Phase; 4] =
        [Phase::Authn, Phase::Authz, Phase::Stats, Phase::Unspecified];

    fn index(self) -> usize {
        match self {
            Phase::Authn => 0,
            Phase::Authz => 1,
            Phase::Stats => 2,
            Phase::Unspecified => 3,
        }
    }
}

/// Ordered extension descriptors per phase for one generation pass.
///
/// Cloning is shallow: bucket vectors are copied, descriptors are shared. The
/// injector clones the map once per filter chain, so draining in one chain
/// never affects another chain or the discovery resolver's view of the pass.
#[derive(Debug, Clone, Default)]
pub struct PhaseMap {
    buckets: [Vec<Arc<ExtensionDescriptor>>; 4],
}

impl PhaseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group externally classified descriptors, preserving input order within
    /// each phase bucket. Duplicate names stay distinct entries.
    pub fn from_classified<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Phase, ExtensionDescriptor)>,
    {
        let mut map = Self::new();
        for (phase, descriptor) in pairs {
            map.insert(phase, Arc::new(descriptor));
        }
        map
    }

    pub fn insert(&mut self, phase: Phase, descriptor: Arc<ExtensionDescriptor>) {
        self.buckets[phase.index()].push(descriptor);
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Total number of queued descriptors across all phases.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Take every descriptor queued in `phase`, leaving the bucket empty so a
    /// later anchor in the same chain cannot re-insert it.
    pub fn drain(&mut self, phase: Phase) -> Vec<Arc<ExtensionDescriptor>> {
        std::mem::take(&mut self.buckets[phase.index()])
    }

    /// Descriptors in deterministic order: phases in drain precedence,
    /// insertion order within a phase.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ExtensionDescriptor>> {
        Phase::DRAIN_ORDER.iter().flat_map(|phase| self.buckets[phase.index()].iter())
    }
}
