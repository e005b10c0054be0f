//! End-to-end tests over the registry's HTTP surface.

use beacon_assign::{SlotAssigner, StaticResolver};
use beacon_registry::{api, AllowList, AppState};
use beacon_store::{MemoryStore, RecordStore};
use beacon_topology::{
    MeshParams, NodeAssignment, RegionCode, Role, RoutingParams, ServiceInfo, SlotId,
    TopologyRecord, UNASSIGNED,
};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

fn sample() -> TopologyRecord {
    let slots = [
        ("ewr", 4, Role::Edge),
        ("lax", 1, Role::Reflector),
        ("mia", 3, Role::Edge),
        ("ord", 2, Role::Edge),
    ]
    .into_iter()
    .map(|(id, octet, role)| NodeAssignment {
        slot_id: SlotId::new(id),
        region_code: RegionCode::new(id),
        overlay_ipv4: Ipv4Addr::new(10, 10, 10, octet),
        overlay_ipv6: format!("fd00:b:0:1::{}", octet).parse().unwrap(),
        public_key: format!("pub-{}", id),
        private_key: format!("priv-{}", id),
        endpoint: UNASSIGNED.into(),
        role,
    })
    .map(|a| (a.slot_id.clone(), a))
    .collect();

    TopologyRecord {
        slots,
        mesh_params: MeshParams {
            listen_port: 51820,
            keepalive_seconds: 25,
        },
        routing_params: RoutingParams {
            local_asn: 65001,
            upstream_asn: 64515,
            upstream_ipv4_neighbor: "169.254.169.254".into(),
            upstream_ipv6_neighbor: "2001:19f0:ffff::1".into(),
            upstream_multihop: 2,
            announced_ipv4: "203.0.113.0/24".into(),
            announced_ipv6: "2001:db8:100::/48".into(),
        },
        service_info: ServiceInfo {
            name: "beacon".into(),
            version: "0.1.0".into(),
        },
    }
}

fn resolver() -> StaticResolver {
    StaticResolver::new()
        .with("149.248.2.74", "lax")
        .with("45.76.18.21", "ord")
        .with("45.77.192.217", "ord")
}

fn loopback() -> AllowList {
    AllowList::new([
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(Ipv6Addr::LOCALHOST),
    ])
}

/// Spin up the router on an ephemeral port, returning its address and
/// the shared store for direct record manipulation.
async fn serve(allowed: AllowList) -> (SocketAddr, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(sample()).unwrap());
    let assigner = SlotAssigner::new(store.clone(), Arc::new(resolver()));
    let state = Arc::new(AppState {
        assigner,
        store: store.clone(),
        allowed,
    });

    let app = api::build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (addr, store)
}

async fn claim(client: &reqwest::Client, addr: SocketAddr, endpoint: &str) -> reqwest::Response {
    client
        .post(format!("http://{}/api/v1/nodes/claim", addr))
        .json(&serde_json::json!({ "endpoint": endpoint }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn claim_resolve_status_flow() {
    let (addr, _) = serve(loopback()).await;
    let client = reqwest::Client::new();

    let response = claim(&client, addr, "149.248.2.74").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "registered");
    assert_eq!(body["slot_id"], "lax");

    let response = claim(&client, addr, "149.248.2.74").await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "updated");
    assert_eq!(body["slot_id"], "lax");

    let body: Value = client
        .get(format!("http://{}/api/v1/nodes/resolve/149.248.2.74", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["slot_id"], "lax");

    let body: Value = client
        .get(format!("http://{}/api/v1/status", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["service"], "beacon");
    assert_eq!(body["total_slots"], 4);
    assert_eq!(body["occupied_slots"], 1);
    assert_eq!(body["revision"], 1);
}

#[tokio::test]
async fn error_kinds_map_to_distinct_statuses() {
    let (addr, _) = serve(loopback()).await;
    let client = reqwest::Client::new();

    // Unknown host: the resolver cannot place it.
    let response = claim(&client, addr, "8.8.8.8").await;
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "region_undetermined");

    // Unparsable endpoint.
    let response = claim(&client, addr, "not an endpoint").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_input");

    // Second claimant for an occupied slot.
    claim(&client, addr, "45.76.18.21").await;
    let response = claim(&client, addr, "45.77.192.217").await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "slot_occupied");

    // Resolve miss.
    let response = client
        .get(format!("http://{}/api/v1/nodes/resolve/9.9.9.9", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn config_endpoints_render_full_peer_lists() {
    let (addr, _) = serve(loopback()).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("http://{}/api/v1/nodes/lax/config", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["interface"]["slot_id"], "lax");
    let peers = body["peers"].as_array().unwrap();
    assert_eq!(peers.len(), 3);
    assert!(peers.iter().all(|p| p["slot_id"] != "lax"));
    // Unclaimed slots still appear, carrying the sentinel.
    assert!(peers.iter().all(|p| p["endpoint"] == UNASSIGNED));

    let body: Value = client
        .get(format!("http://{}/api/v1/nodes/ord/config/files", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["tunnel.conf", "daemon.conf", "static.conf", "upstream.conf", "mesh.conf"]
    );

    let response = client
        .get(format!("http://{}/api/v1/nodes/syd/config", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn audit_reports_misplaced_endpoint() {
    let (addr, store) = serve(loopback()).await;
    let client = reqwest::Client::new();

    // Plant an ord host into mia directly in the record.
    let (mut record, version) = store.load().await.unwrap();
    record.slots.get_mut(&SlotId::new("mia")).unwrap().endpoint = "45.77.192.217:51820".into();
    store.store(&record, version).await.unwrap();

    let body: Value = client
        .get(format!("http://{}/api/v1/audit", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let corrections = body["corrections"].as_array().unwrap();
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0]["endpoint"], "45.77.192.217");
    assert_eq!(corrections[0]["current_slot"], "mia");
    assert_eq!(corrections[0]["correct_slot"], "ord");
}

#[tokio::test]
async fn unlisted_callers_cannot_claim_or_audit() {
    // Empty allow-list: nobody may mutate, not even loopback.
    let (addr, _) = serve(AllowList::default()).await;
    let client = reqwest::Client::new();

    let response = claim(&client, addr, "149.248.2.74").await;
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    let response = client
        .get(format!("http://{}/api/v1/audit", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Read surface stays open.
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("http://{}/api/v1/status", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
