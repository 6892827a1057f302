use log::info;
use std::time::{Duration, Instant};

use netroute::graph::generators::generate_street_grid;
use netroute::{HeapType, Router, RouterConfig};

/// Times one distance-matrix batch from `origins` to every vertex
fn benchmark_heap(
    heap: HeapType,
    base: &RouterConfig,
    edges: &netroute::EdgeList<usize>,
    origins: &[usize],
    destinations: &[usize],
) -> netroute::Result<(Duration, f64)> {
    let config = base.clone().with_heap(heap);
    let router = Router::new(edges.clone(), config)?;

    let start = Instant::now();
    let matrix = router.distance_matrix(origins, destinations)?;
    let duration = start.elapsed();

    // checksum so every heap can be compared at a glance
    let reachable_sum: f64 = matrix.as_slice().iter().filter(|d| d.is_finite()).sum();
    println!("  - {:<8} {:?}", heap.name(), duration);
    Ok((duration, reachable_sum))
}

fn main() -> netroute::Result<()> {
    env_logger::init();

    // optional JSON config path as the only argument
    let base = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| {
                netroute::Error::InvalidParameter(format!("cannot read {}: {}", path, e))
            })?;
            RouterConfig::from_json(&json)?
        }
        None => RouterConfig::new(),
    };
    info!("base config: {:?}", base);

    let grid_sizes = vec![32, 64, 128];
    let origin_count = 64;

    println!("=====================================================");
    println!("Benchmark: distance matrix per priority queue");
    println!("Origins per batch: {}", origin_count);
    println!("=====================================================");

    let mut results = Vec::new();
    for &side in &grid_sizes {
        let network = generate_street_grid(side, side, 42);
        let vertices: Vec<usize> = (0..network.vertex_count).collect();
        let step = (network.vertex_count / origin_count).max(1);
        let origins: Vec<usize> = vertices.iter().copied().step_by(step).take(origin_count).collect();

        println!(
            "\nStreet grid {}x{}: {} vertices, {} edges",
            side,
            side,
            network.vertex_count,
            network.edges.len()
        );

        let mut checksum = None;
        for heap in HeapType::ALL {
            let (duration, sum) =
                benchmark_heap(heap, &base, &network.edges, &origins, &vertices)?;
            match checksum {
                None => checksum = Some(sum),
                Some(expected) if (expected - sum).abs() > 1e-6 * expected.abs().max(1.0) => {
                    println!("    checksum mismatch: {} vs {}", sum, expected);
                }
                Some(_) => {}
            }
            results.push((network.vertex_count, heap, duration));
        }
    }

    println!("\n=====================================================");
    println!("Summary of Results");
    println!("=====================================================");
    println!("{:<10} | {:<8} | {:<10}", "Vertices", "Heap", "Time (ms)");
    println!("-----------------------------------------------------");
    for (size, heap, duration) in &results {
        println!(
            "{:<10} | {:<8} | {:<10.2}",
            size,
            heap.name(),
            duration.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}
