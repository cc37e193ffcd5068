//! Jet cluster: jets from several subjects grouped as one physical event.
//!
//! Only the container lives here; grouping is done upstream.

use crate::jet::Jet;

#[derive(Clone, Debug)]
pub struct JetCluster {
    pub id: String,
    pub jets: Vec<Jet>,
}

impl JetCluster {
    pub fn new(id: impl Into<String>, jets: Vec<Jet>) -> Self {
        Self {
            id: id.into(),
            jets,
        }
    }

    /// Subject ids of the member jets, in jet order.
    pub fn subjects(&self) -> Vec<u64> {
        self.jets.iter().map(Jet::subject).collect()
    }
}

/// Find a cluster by id.
pub fn find_cluster<'a>(clusters: &'a [JetCluster], id: &str) -> Option<&'a JetCluster> {
    clusters.iter().find(|c| c.id == id)
}
