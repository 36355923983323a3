//! Client behavior over stub and post-message transports
#![allow(clippy::unwrap_used)]

use assert_matches::assert_matches;
use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use pairlink_client::{
    Client, ClientConfig, ClientEvent, DAppClient, EventKind, RequestHandler, WalletClient,
};
use pairlink_core::{
    AccountInfo, AccountStore, BaseMessage, Channel, ConnectionContext, DomainError, ErrorKind,
    InboundPayload, JsonSerializer, MemoryStorage, MessageCallback, MessageType, Origin,
    PairlinkError, PostMessagePairingRequest, Result, Serializer, StorageAccountManager,
    StorageKey, StoragePeerManager, TransportStatus, TransportType,
};
use pairlink_transport::{MessageHub, PostMessageTransport, Transport, TransportCore};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

type Handle = Arc<dyn Transport<PostMessagePairingRequest>>;
type Seen = Arc<Mutex<Vec<(BaseMessage, ConnectionContext)>>>;

struct NullChannel;

#[async_trait]
impl Channel<PostMessagePairingRequest> for NullChannel {
    async fn send_message(&self, _peer: &PostMessagePairingRequest, _payload: &str) -> Result<()> {
        Ok(())
    }

    async fn listen_for_peer(&self, _public_key: &str, _callback: MessageCallback) -> Result<()> {
        Ok(())
    }

    async fn unsubscribe_from_peer(&self, _public_key: &str) -> Result<()> {
        Ok(())
    }

    async fn unsubscribe_from_all(&self) -> Result<()> {
        Ok(())
    }
}

struct StubTransport {
    core: TransportCore<PostMessagePairingRequest>,
}

impl StubTransport {
    fn handle() -> Arc<Self> {
        let peers = StoragePeerManager::<PostMessagePairingRequest>::new(
            Arc::new(MemoryStorage::new()),
            StorageKey::TransportP2pPeersWallet,
        );
        Arc::new(Self {
            core: TransportCore::new("stub", Arc::new(peers), Arc::new(NullChannel)),
        })
    }
}

#[async_trait]
impl Transport<PostMessagePairingRequest> for StubTransport {
    fn core(&self) -> &TransportCore<PostMessagePairingRequest> {
        &self.core
    }

    fn transport_type(&self) -> TransportType {
        TransportType::P2p
    }

    async fn listen(&self, _public_key: &str) -> Result<()> {
        Ok(())
    }
}

fn accounts() -> Arc<StorageAccountManager> {
    Arc::new(StorageAccountManager::new(Arc::new(MemoryStorage::new())))
}

fn client() -> Client<PostMessagePairingRequest> {
    Client::new(ClientConfig::for_testing(), accounts()).unwrap()
}

fn recorder() -> (Arc<dyn RequestHandler>, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = move |message: BaseMessage, context: &ConnectionContext| -> Result<()> {
        sink.lock().push((message, context.clone()));
        Ok(())
    };
    (Arc::new(handler), seen)
}

fn post_message_transport(
    seed: u8,
    hub: &MessageHub,
    key: StorageKey,
) -> (Arc<PostMessageTransport>, String) {
    let transport: PostMessageTransport = PostMessageTransport::new(
        "app",
        SigningKey::from_bytes(&[seed; 32]),
        hub.clone(),
        Arc::new(MemoryStorage::new()),
        key,
    );
    let public_key = transport.public_key().to_string();
    (Arc::new(transport), public_key)
}

fn encoded(message: &BaseMessage) -> InboundPayload {
    InboundPayload::Text(JsonSerializer.serialize(message).unwrap())
}

fn context(id: &str) -> ConnectionContext {
    ConnectionContext::new(Origin::P2p, id)
}

#[tokio::test]
async fn test_second_init_keeps_first_transport() {
    let client = client();
    let hub = MessageHub::new();
    let (first, _) = post_message_transport(1, &hub, StorageKey::TransportPostMessagePeersWallet);
    let first: Handle = first;
    let second: Handle = StubTransport::handle();

    assert_eq!(client.init(Arc::clone(&first)).await, TransportType::PostMessage);
    assert_eq!(client.init(Arc::clone(&second)).await, TransportType::PostMessage);

    let active = client.active_transport().unwrap();
    assert!(Arc::ptr_eq(&active, &first));
    assert_eq!(first.core().listener_count(), 1);
    assert_eq!(second.core().listener_count(), 0);
}

#[tokio::test]
async fn test_cleared_slot_accepts_fresh_init() {
    let client = client();
    let first: Handle = StubTransport::handle();
    client.init(Arc::clone(&first)).await;
    first.connect().await.unwrap();
    assert_eq!(client.connection_status(), TransportStatus::Connected);

    client.clear_transport();
    assert_eq!(client.connection_status(), TransportStatus::NotConnected);
    assert!(client.active_transport().is_none());
    assert_eq!(first.core().listener_count(), 0);

    let hub = MessageHub::new();
    let (fresh, _) = post_message_transport(1, &hub, StorageKey::TransportPostMessagePeersDapp);
    assert_eq!(client.init(fresh).await, TransportType::PostMessage);
}

#[tokio::test]
async fn test_waiters_resolve_on_init() {
    let client = client();
    let transport: Handle = StubTransport::handle();
    transport
        .add_peer(PostMessagePairingRequest::new("dapp", "aa"))
        .await
        .unwrap();

    let install = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        client.init(Arc::clone(&transport)).await
    };
    let (peers, (), installed) = tokio::time::timeout(Duration::from_secs(2), async {
        tokio::join!(client.get_peers(), client.ready(), install)
    })
    .await
    .unwrap();

    assert_eq!(installed, TransportType::P2p);
    assert_eq!(peers.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_transport_swaps_settled_slot() {
    let client = client();
    let first: Handle = StubTransport::handle();
    let second: Handle = StubTransport::handle();
    client.init(Arc::clone(&first)).await;

    client.set_transport(Some(Arc::clone(&second)));

    assert!(Arc::ptr_eq(&client.transport().await, &second));
    assert_eq!(first.core().listener_count(), 0);
    assert_eq!(second.core().listener_count(), 1);

    // Re-setting the same transport does not wire a second listener.
    client.set_transport(Some(Arc::clone(&second)));
    assert_eq!(second.core().listener_count(), 1);
}

#[tokio::test]
async fn test_slot_changes_emit_events() {
    let client = client();
    let mut events = client.subscribe_events();
    let transport: Handle = StubTransport::handle();

    client.init(Arc::clone(&transport)).await;
    client.init(StubTransport::handle()).await;
    client.clear_transport();

    assert_matches!(
        events.recv().await.unwrap(),
        ClientEvent::ActiveTransportSet(Some(t)) if Arc::ptr_eq(&t, &transport)
    );
    assert_matches!(
        events.recv().await.unwrap(),
        ClientEvent::ActiveTransportSet(None)
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_inbound_request_reaches_handler() {
    let (handler, seen) = recorder();
    let client = client().with_handler(handler);
    let transport: Handle = StubTransport::handle();
    client.init(Arc::clone(&transport)).await;

    let request = BaseMessage::new("dapp", MessageType::PermissionRequest, serde_json::json!({}));
    assert_eq!(
        transport
            .core()
            .notify_listeners(&encoded(&request), &context("dapp")),
        1
    );

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, request);
    assert_eq!(seen[0].1.id, "dapp");
}

#[tokio::test]
async fn test_inbound_failures_reach_error_channel() {
    let (handler, seen) = recorder();
    let client = client().with_handler(handler);
    let mut errors = client.take_inbound_errors().unwrap();
    let transport: Handle = StubTransport::handle();
    client.init(Arc::clone(&transport)).await;

    transport
        .core()
        .notify_listeners(&InboundPayload::from("<html>"), &context("dapp"));
    transport
        .core()
        .notify_listeners(&InboundPayload::Binary(vec![0xde, 0xad]), &context("dapp"));

    let report = errors.try_recv().unwrap();
    assert_eq!(report.context.id, "dapp");
    assert_matches!(report.error, PairlinkError::Decode { .. });
    assert!(errors.try_recv().is_err());
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn test_missing_handler_is_surfaced() {
    let client = client();
    let mut errors = client.take_inbound_errors().unwrap();
    let mut events = client.subscribe_events();
    let transport: Handle = StubTransport::handle();
    client.init(Arc::clone(&transport)).await;
    assert_eq!(
        events.recv().await.unwrap().kind(),
        EventKind::ActiveTransportSet
    );

    let request = BaseMessage::new("dapp", MessageType::OperationRequest, serde_json::json!({}));
    transport
        .core()
        .notify_listeners(&encoded(&request), &context("dapp"));

    let report = errors.try_recv().unwrap();
    assert_eq!(report.message_id.as_deref(), Some(request.id.as_str()));
    assert_matches!(report.error, PairlinkError::HandlerNotInstalled { .. });
    assert_eq!(events.recv().await.unwrap().kind(), EventKind::InternalError);
}

#[tokio::test]
async fn test_respond_to_unknown_peer_fails() {
    let client = client();
    client.init(StubTransport::handle()).await;

    let request = BaseMessage::new("dapp", MessageType::PermissionRequest, serde_json::json!({}));
    let ack = BaseMessage::acknowledge(&request, "wallet");
    let result = client.respond(&ack, "nobody").await;
    assert_matches!(result, Err(PairlinkError::PeerUnknown { .. }));
}

#[tokio::test]
async fn test_account_delegation() {
    let accounts = accounts();
    let client =
        Client::<PostMessagePairingRequest>::new(ClientConfig::for_testing(), accounts.clone())
            .unwrap();
    accounts
        .add_account(AccountInfo {
            account_identifier: "acc-1".into(),
            sender_id: "dapp".into(),
            address: "tz1".into(),
            public_key: "edpk".into(),
            network: "mainnet".into(),
            scopes: vec!["sign".into()],
            connected_at: 1,
        })
        .await
        .unwrap();

    assert_eq!(client.get_accounts().await.unwrap().len(), 1);
    assert!(client.get_account("acc-1").await.unwrap().is_some());
    client.remove_account("acc-1").await.unwrap();
    assert!(client.get_account("acc-1").await.unwrap().is_none());
    client.remove_all_accounts().await.unwrap();
    assert!(client.get_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dapp_requests_are_rate_limited() {
    let (handler, _seen) = recorder();
    let dapp = DAppClient::<PostMessagePairingRequest>::new(
        ClientConfig::for_testing(),
        accounts(),
        handler,
        "dapp",
    )
    .unwrap();
    dapp.client().init(StubTransport::handle()).await;

    for _ in 0..2 {
        dapp.request(MessageType::PermissionRequest, serde_json::json!({}), None)
            .await
            .unwrap();
    }
    let refused = dapp
        .request(MessageType::PermissionRequest, serde_json::json!({}), None)
        .await;
    assert_matches!(
        refused,
        Err(PairlinkError::Domain(DomainError { kind: ErrorKind::TooManyOperations, .. }))
    );
}

#[tokio::test]
async fn test_wallet_and_dapp_exchange_over_post_message() {
    let hub = MessageHub::new();
    let (wallet_transport, wallet_key) =
        post_message_transport(1, &hub, StorageKey::TransportPostMessagePeersWallet);
    let (dapp_transport, dapp_key) =
        post_message_transport(2, &hub, StorageKey::TransportPostMessagePeersDapp);

    let (wallet_handler, wallet_seen) = recorder();
    let wallet = WalletClient::<PostMessagePairingRequest>::new(
        ClientConfig::new("Wallet"),
        accounts(),
        wallet_handler,
        wallet_key.as_str(),
    )
    .unwrap();
    let (dapp_handler, dapp_seen) = recorder();
    let dapp = DAppClient::<PostMessagePairingRequest>::new(
        ClientConfig::new("Dapp"),
        accounts(),
        dapp_handler,
        dapp_key.as_str(),
    )
    .unwrap();

    wallet.client().init(wallet_transport).await;
    dapp.client().init(dapp_transport).await;
    wallet
        .client()
        .add_peer(PostMessagePairingRequest::new("Dapp", dapp_key.as_str()))
        .await
        .unwrap();
    dapp.client()
        .add_peer(PostMessagePairingRequest::new("Wallet", wallet_key.as_str()))
        .await
        .unwrap();

    let request = dapp
        .request(
            MessageType::PermissionRequest,
            serde_json::json!({ "network": "mainnet" }),
            Some(wallet_key.as_str()),
        )
        .await
        .unwrap();

    let received = {
        let seen = wallet_seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1.id, dapp_key);
        assert_eq!(seen[0].1.origin, Origin::Extension);
        seen[0].0.clone()
    };
    assert_eq!(received, request);

    wallet.acknowledge(&received).await.unwrap();
    wallet
        .respond_error(&received, &DomainError::not_granted())
        .await
        .unwrap();

    let seen = dapp_seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0.message_type, MessageType::Acknowledge);
    assert_eq!(seen[1].0.id, request.id);
    assert_eq!(
        seen[1].0.domain_error().map(|error| error.kind),
        Some(ErrorKind::NotGrantedError)
    );
}

#[tokio::test]
async fn test_inbound_error_queue_is_bounded() {
    let client = client();
    let capacity = client.config().inbound_error_capacity;
    let transport: Handle = StubTransport::handle();
    client.init(Arc::clone(&transport)).await;

    for _ in 0..10_000 {
        transport
            .core()
            .notify_listeners(&InboundPayload::from("garbage"), &context("dapp"));
    }

    let mut errors = client.take_inbound_errors().unwrap();
    let mut queued = 0;
    while errors.try_recv().is_ok() {
        queued += 1;
    }
    assert_eq!(queued, capacity);
}
