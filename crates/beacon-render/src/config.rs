//! Structured per-node configuration.

use crate::error::{Error, Result};
use crate::fragments;
use beacon_topology::{Role, SlotId, TopologyRecord};
use serde::Serialize;

/// The node's own tunnel interface parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceConfig {
    pub slot_id: SlotId,
    pub role: Role,
    pub private_key: String,
    /// Overlay addresses with their interface prefixes (`/24`, `/64`).
    pub addresses: [String; 2],
    pub listen_port: u16,
}

/// One peer entry in the node's tunnel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerConfig {
    pub slot_id: SlotId,
    pub role: Role,
    pub public_key: String,
    /// `host:port` of the peer, or the `unassigned` sentinel.
    pub endpoint: String,
    /// Host routes for the peer's overlay addresses (`/32`, `/128`).
    pub allowed_addresses: [String; 2],
    pub keepalive_seconds: u16,
}

/// Routing-daemon fragments derived for this node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingFragments {
    pub daemon_base: String,
    pub static_routes: String,
    pub upstream_peering: String,
    pub mesh_peering: String,
}

/// Everything one node needs to join the mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConfig {
    pub interface: InterfaceConfig,
    pub peers: Vec<PeerConfig>,
    pub routing: RoutingFragments,
}

/// A named file in the rendered per-node bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    pub name: &'static str,
    pub contents: String,
}

/// Derive the full configuration for one slot.
///
/// Fails with [`Error::NotFound`] for a slot outside the topology. The
/// peer list contains every *other* slot in ascending slot-id order,
/// including slots still carrying the sentinel endpoint.
pub fn render_node_config(record: &TopologyRecord, slot_id: &SlotId) -> Result<NodeConfig> {
    let node = record
        .slots
        .get(slot_id)
        .ok_or_else(|| Error::NotFound(slot_id.clone()))?;

    let interface = InterfaceConfig {
        slot_id: node.slot_id.clone(),
        role: node.role,
        private_key: node.private_key.clone(),
        addresses: [
            format!("{}/24", node.overlay_ipv4),
            format!("{}/64", node.overlay_ipv6),
        ],
        listen_port: record.mesh_params.listen_port,
    };

    let peers = record
        .slots
        .values()
        .filter(|peer| peer.slot_id != node.slot_id)
        .map(|peer| PeerConfig {
            slot_id: peer.slot_id.clone(),
            role: peer.role,
            public_key: peer.public_key.clone(),
            endpoint: peer.endpoint.clone(),
            allowed_addresses: [
                format!("{}/32", peer.overlay_ipv4),
                format!("{}/128", peer.overlay_ipv6),
            ],
            keepalive_seconds: record.mesh_params.keepalive_seconds,
        })
        .collect();

    let routing = RoutingFragments {
        daemon_base: fragments::daemon_base(node),
        static_routes: fragments::static_routes(&record.routing_params),
        upstream_peering: fragments::upstream_peering(node, &record.routing_params),
        mesh_peering: fragments::mesh_peering(record, node)?,
    };

    Ok(NodeConfig {
        interface,
        peers,
        routing,
    })
}

impl NodeConfig {
    /// Render the tunnel configuration document.
    pub fn to_tunnel_document(&self) -> String {
        let mut out = format!(
            "[Interface]
# {slot} ({role})
PrivateKey = {key}
Address = {v4}, {v6}
ListenPort = {port}
",
            slot = self.interface.slot_id,
            role = self.interface.role,
            key = self.interface.private_key,
            v4 = self.interface.addresses[0],
            v6 = self.interface.addresses[1],
            port = self.interface.listen_port,
        );

        for peer in &self.peers {
            out.push_str(&format!(
                "
[Peer]
# {slot} ({role})
PublicKey = {key}
Endpoint = {endpoint}
AllowedIPs = {v4}, {v6}
PersistentKeepalive = {keepalive}
",
                slot = peer.slot_id,
                role = peer.role,
                key = peer.public_key,
                endpoint = peer.endpoint,
                v4 = peer.allowed_addresses[0],
                v6 = peer.allowed_addresses[1],
                keepalive = peer.keepalive_seconds,
            ));
        }

        out
    }

    /// The per-node file bundle written out by the admin CLI.
    pub fn file_set(&self) -> Vec<ConfigFile> {
        vec![
            ConfigFile {
                name: "tunnel.conf",
                contents: self.to_tunnel_document(),
            },
            ConfigFile {
                name: "daemon.conf",
                contents: self.routing.daemon_base.clone(),
            },
            ConfigFile {
                name: "static.conf",
                contents: self.routing.static_routes.clone(),
            },
            ConfigFile {
                name: "upstream.conf",
                contents: self.routing.upstream_peering.clone(),
            },
            ConfigFile {
                name: "mesh.conf",
                contents: self.routing.mesh_peering.clone(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_topology::{
        MeshParams, NodeAssignment, RegionCode, RoutingParams, ServiceInfo, UNASSIGNED,
    };
    use std::net::Ipv4Addr;

    fn sample() -> TopologyRecord {
        let slots = [
            ("ewr", 4, Role::Edge, "149.28.56.192:51820"),
            ("lax", 1, Role::Reflector, "149.248.2.74:51820"),
            ("mia", 3, Role::Edge, UNASSIGNED),
            ("ord", 2, Role::Edge, "45.76.18.21:51820"),
        ]
        .into_iter()
        .map(|(id, octet, role, endpoint)| NodeAssignment {
            slot_id: SlotId::new(id),
            region_code: RegionCode::new(id),
            overlay_ipv4: Ipv4Addr::new(10, 10, 10, octet),
            overlay_ipv6: format!("fd00:b:0:1::{}", octet).parse().unwrap(),
            public_key: format!("pub-{}", id),
            private_key: format!("priv-{}", id),
            endpoint: endpoint.into(),
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

    #[test]
    fn unknown_slot_is_not_found() {
        let err = render_node_config(&sample(), &SlotId::new("syd")).unwrap_err();
        assert_eq!(err, Error::NotFound(SlotId::new("syd")));
    }

    #[test]
    fn peers_exclude_self_and_ascend() {
        let config = render_node_config(&sample(), &SlotId::new("lax")).unwrap();

        let ids: Vec<_> = config.peers.iter().map(|p| p.slot_id.as_str()).collect();
        assert_eq!(ids, ["ewr", "mia", "ord"]);
    }

    #[test]
    fn unassigned_peer_keeps_sentinel_endpoint() {
        let config = render_node_config(&sample(), &SlotId::new("lax")).unwrap();

        let mia = config
            .peers
            .iter()
            .find(|p| p.slot_id == SlotId::new("mia"))
            .unwrap();
        assert_eq!(mia.endpoint, UNASSIGNED);

        let doc = config.to_tunnel_document();
        assert!(doc.contains("Endpoint = unassigned"));
    }

    #[test]
    fn allowed_addresses_are_host_routes() {
        let config = render_node_config(&sample(), &SlotId::new("lax")).unwrap();
        let ord = config
            .peers
            .iter()
            .find(|p| p.slot_id == SlotId::new("ord"))
            .unwrap();
        assert_eq!(
            ord.allowed_addresses,
            ["10.10.10.2/32".to_string(), "fd00:b:0:1::2/128".to_string()]
        );
    }

    #[test]
    fn repeated_renders_are_byte_identical() {
        let record = sample();
        for id in ["ewr", "lax", "mia", "ord"] {
            let slot = SlotId::new(id);
            let first = render_node_config(&record, &slot).unwrap();
            let second = render_node_config(&record, &slot).unwrap();

            assert_eq!(first, second);
            assert_eq!(first.to_tunnel_document(), second.to_tunnel_document());
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    #[test]
    fn tunnel_document_lists_interface_then_peers() {
        let config = render_node_config(&sample(), &SlotId::new("ord")).unwrap();
        let doc = config.to_tunnel_document();

        assert!(doc.starts_with("[Interface]\n# ord (edge)\nPrivateKey = priv-ord\n"));
        assert_eq!(doc.matches("[Peer]").count(), 3);
        assert!(doc.contains("PublicKey = pub-lax"));
        assert!(!doc.contains("PublicKey = pub-ord"));
        assert!(doc.contains("PersistentKeepalive = 25"));
    }

    #[test]
    fn file_set_covers_all_documents() {
        let config = render_node_config(&sample(), &SlotId::new("lax")).unwrap();
        let names: Vec<_> = config.file_set().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["tunnel.conf", "daemon.conf", "static.conf", "upstream.conf", "mesh.conf"]
        );
    }
}
