//! Benchmarks for mesh config derivation.
//!
//! Measures structured derivation and tunnel-document rendering as the
//! slot count grows.

use beacon_render::render_node_config;
use beacon_topology::{
    MeshParams, NodeAssignment, RegionCode, Role, RoutingParams, ServiceInfo, SlotId,
    TopologyRecord, UNASSIGNED,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::net::Ipv4Addr;

fn record_with_slots(count: u8) -> TopologyRecord {
    let slots = (0..count)
        .map(|i| {
            let id = format!("s{:03}", i);
            NodeAssignment {
                slot_id: SlotId::new(&id),
                region_code: RegionCode::new(&id),
                overlay_ipv4: Ipv4Addr::new(10, 10, 10, i + 1),
                overlay_ipv6: format!("fd00:b:0:1::{:x}", i + 1).parse().unwrap(),
                public_key: format!("pub-{}", id),
                private_key: format!("priv-{}", id),
                endpoint: if i % 2 == 0 {
                    format!("192.0.2.{}:51820", i + 1)
                } else {
                    UNASSIGNED.to_string()
                },
                role: if i == 0 { Role::Reflector } else { Role::Edge },
            }
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

fn bench_render_node_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_node_config");

    for &count in &[4u8, 16, 64] {
        let record = record_with_slots(count);
        let slot = SlotId::new("s000");
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &record, |b, record| {
            b.iter(|| render_node_config(black_box(record), &slot).unwrap())
        });
    }
    group.finish();
}

fn bench_tunnel_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("tunnel_document");

    for &count in &[4u8, 16, 64] {
        let record = record_with_slots(count);
        let config = render_node_config(&record, &SlotId::new("s000")).unwrap();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &config, |b, config| {
            b.iter(|| black_box(config).to_tunnel_document())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render_node_config, bench_tunnel_document);
criterion_main!(benches);
