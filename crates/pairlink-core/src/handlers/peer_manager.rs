//! Peer store backed by the storage capability

use super::list_store::ListStore;
use crate::{Peer, PeerStore, Result, Storage, StorageKey};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Known peers persisted as a JSON list under one storage key
pub struct StoragePeerManager<P> {
    list: ListStore,
    _peer: PhantomData<fn() -> P>,
}

impl<P: Peer> StoragePeerManager<P> {
    /// Create a manager over `key`
    pub fn new(storage: Arc<dyn Storage>, key: StorageKey) -> Self {
        Self {
            list: ListStore::new(storage, key),
            _peer: PhantomData,
        }
    }

    /// Storage key this manager persists to
    pub fn storage_key(&self) -> StorageKey {
        self.list.key()
    }
}

#[async_trait]
impl<P: Peer> PeerStore<P> for StoragePeerManager<P> {
    async fn get_peers(&self) -> Result<Vec<P>> {
        self.list.load().await
    }

    async fn has_peer(&self, public_key: &str) -> Result<bool> {
        Ok(self
            .get_peers()
            .await?
            .iter()
            .any(|peer| peer.public_key() == public_key))
    }

    async fn add_peer(&self, peer: P) -> Result<()> {
        let key = self.list.key();
        self.list
            .update(move |peers: &mut Vec<P>| {
                if peers.iter().any(|p| p.public_key() == peer.public_key()) {
                    debug!(storage_key = %key, public_key = %peer.public_key(), "Peer already stored");
                } else {
                    peers.push(peer);
                }
            })
            .await
    }

    async fn remove_peer(&self, public_key: &str) -> Result<()> {
        self.list
            .update(|peers: &mut Vec<P>| peers.retain(|p| p.public_key() != public_key))
            .await
    }

    async fn remove_all_peers(&self) -> Result<()> {
        self.list.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, PostMessagePairingRequest};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn manager() -> StoragePeerManager<PostMessagePairingRequest> {
        StoragePeerManager::new(
            Arc::new(MemoryStorage::new()),
            StorageKey::TransportPostMessagePeersWallet,
        )
    }

    #[tokio::test]
    async fn test_add_is_unique_by_public_key() {
        let peers = manager();
        peers
            .add_peer(PostMessagePairingRequest::new("first", "aa"))
            .await
            .unwrap();
        peers
            .add_peer(PostMessagePairingRequest::new("renamed", "aa"))
            .await
            .unwrap();

        let stored = peers.get_peers().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "first");
        assert!(peers.has_peer("aa").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let peers = manager();
        for key in ["aa", "bb", "cc"] {
            peers
                .add_peer(PostMessagePairingRequest::new(key, key))
                .await
                .unwrap();
        }

        peers.remove_peer("bb").await.unwrap();
        assert!(!peers.has_peer("bb").await.unwrap());
        assert_eq!(
            peers.get_peer("cc").await.unwrap().map(|p| p.name),
            Some("cc".to_string())
        );

        peers.remove_all_peers().await.unwrap();
        assert!(peers.get_peers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_storage_is_reported() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(StorageKey::TransportPostMessagePeersWallet, "{".to_string())
            .await
            .unwrap();
        let peers: StoragePeerManager<PostMessagePairingRequest> = StoragePeerManager::new(
            storage,
            StorageKey::TransportPostMessagePeersWallet,
        );
        assert!(peers.get_peers().await.is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![(0u8..6).prop_map(Op::Add), (0u8..6).prop_map(Op::Remove)]
    }

    proptest! {
        #[test]
        fn prop_peer_set_matches_model(ops in proptest::collection::vec(op(), 0..24)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let peers = manager();
                let mut model = BTreeSet::new();
                for op in ops {
                    match op {
                        Op::Add(k) => {
                            let key = format!("{k:02x}");
                            peers.add_peer(PostMessagePairingRequest::new("p", key.clone())).await.unwrap();
                            model.insert(key);
                        }
                        Op::Remove(k) => {
                            let key = format!("{k:02x}");
                            peers.remove_peer(&key).await.unwrap();
                            model.remove(&key);
                        }
                    }
                }
                let stored: Vec<String> = peers
                    .get_peers()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|p| p.public_key)
                    .collect();
                let unique: BTreeSet<String> = stored.iter().cloned().collect();
                assert_eq!(unique.len(), stored.len());
                assert_eq!(unique, model);
            });
        }
    }
}
