//! Known-peer persistence capability

use crate::{Peer, Result};
use async_trait::async_trait;

/// Set of known peers, unique by public key.
///
/// Adding a peer whose key is already known leaves the set unchanged.
#[async_trait]
pub trait PeerStore<P: Peer>: Send + Sync {
    /// All known peers
    async fn get_peers(&self) -> Result<Vec<P>>;

    /// Whether a peer with `public_key` is known
    async fn has_peer(&self, public_key: &str) -> Result<bool>;

    /// Persist a peer
    async fn add_peer(&self, peer: P) -> Result<()>;

    /// Forget the peer with `public_key`
    async fn remove_peer(&self, public_key: &str) -> Result<()>;

    /// Forget every peer
    async fn remove_all_peers(&self) -> Result<()>;

    /// Look up a single peer
    async fn get_peer(&self, public_key: &str) -> Result<Option<P>> {
        Ok(self
            .get_peers()
            .await?
            .into_iter()
            .find(|peer| peer.public_key() == public_key))
    }
}
