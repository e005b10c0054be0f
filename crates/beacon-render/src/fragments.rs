//! Routing-daemon fragment renderers.
//!
//! Each fragment is a named template materialised from typed record
//! fields, so a missing value is a compile error here rather than a
//! literal placeholder leaking into a daemon config.

use crate::error::{Error, Result};
use beacon_topology::{NodeAssignment, Role, RoutingParams, TopologyRecord};

/// Router-id and logging preamble for the daemon.
pub fn daemon_base(node: &NodeAssignment) -> String {
    format!(
        "# {slot} ({role})
log syslog all;
router id {router_id};

protocol device {{
}}

protocol direct {{
    ipv4;
    ipv6;
}}
",
        slot = node.slot_id,
        role = node.role,
        router_id = node.overlay_ipv4,
    )
}

/// Announced service prefixes, pinned as static reject routes.
pub fn static_routes(routing: &RoutingParams) -> String {
    format!(
        "# Announced service prefixes
protocol static announce4 {{
    ipv4;
    route {v4} reject;
}}

protocol static announce6 {{
    ipv6;
    route {v6} reject;
}}
",
        v4 = routing.announced_ipv4,
        v6 = routing.announced_ipv6,
    )
}

/// eBGP sessions to the upstream route servers.
pub fn upstream_peering(node: &NodeAssignment, routing: &RoutingParams) -> String {
    format!(
        "# {slot}: eBGP to the upstream route servers
protocol bgp upstream4 {{
    local as {local_asn};
    neighbor {v4_neighbor} as {upstream_asn};
    multihop {multihop};
    ipv4 {{
        import none;
        export where proto = \"announce4\";
    }};
}}

protocol bgp upstream6 {{
    local as {local_asn};
    neighbor {v6_neighbor} as {upstream_asn};
    multihop {multihop};
    ipv6 {{
        import none;
        export where proto = \"announce6\";
    }};
}}
",
        slot = node.slot_id,
        local_asn = routing.local_asn,
        upstream_asn = routing.upstream_asn,
        v4_neighbor = routing.upstream_ipv4_neighbor,
        v6_neighbor = routing.upstream_ipv6_neighbor,
        multihop = routing.upstream_multihop,
    )
}

/// Internal mesh peering over the overlay addresses.
///
/// The reflector carries a client session for every other slot; an edge
/// node carries a single session toward the reflector. Sessions ride the
/// overlay addresses, which exist for every slot whether or not a node
/// has claimed it yet.
pub fn mesh_peering(record: &TopologyRecord, node: &NodeAssignment) -> Result<String> {
    let local_asn = record.routing_params.local_asn;
    let reflector = record.reflector().ok_or(Error::MissingReflector)?;

    if node.role == Role::Reflector {
        let mut out = String::from("# iBGP mesh sessions (route reflector)\n");
        for peer in record.slots.values().filter(|a| a.slot_id != node.slot_id) {
            out.push_str(&format!(
                "
protocol bgp mesh_{slot} {{
    local as {asn};
    neighbor {neighbor} as {asn};
    rr client;
    ipv4 {{
        import all;
        export all;
    }};
}}
",
                slot = peer.slot_id,
                asn = local_asn,
                neighbor = peer.overlay_ipv4,
            ));
        }
        Ok(out)
    } else {
        Ok(format!(
            "# iBGP session to the route reflector
protocol bgp mesh_{slot} {{
    local as {asn};
    neighbor {neighbor} as {asn};
    ipv4 {{
        import all;
        export all;
    }};
}}
",
            slot = reflector.slot_id,
            asn = local_asn,
            neighbor = reflector.overlay_ipv4,
        ))
    }
}
