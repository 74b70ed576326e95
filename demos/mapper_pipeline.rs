use nerve::cluster::{ClusterStep, Dbscan};
use nerve::cover::UniformCover;
use nerve::lens::{Identity, L1Centrality};
use nerve::{Mapper, PointCloud};
use rand::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Run with RUST_LOG=info (or debug for per-hypercube lines) to follow the
    // pipeline.
    env_logger::init();

    // Two noisy circles: Mapper over the x coordinate should recover two
    // loops.
    let mut rng = StdRng::seed_from_u64(7);
    let mut rows = Vec::new();
    for (cx, r) in [(0.0, 1.0), (4.0, 1.5)] {
        for i in 0..120 {
            let t = i as f64 / 120.0 * std::f64::consts::TAU;
            let jitter = rng.random_range(-0.03..0.03);
            rows.push(vec![cx + (r + jitter) * t.cos(), (r + jitter) * t.sin()]);
        }
    }
    let points = PointCloud::from_rows(&rows)?;

    let mapper = Mapper::new().with_verbose(true);
    let x = Identity::new().with_columns(vec![0]);
    let projected = mapper.filter(&points, &[&x])?;
    let cover = UniformCover::new(projected.view(), 12, 0.3)?;
    let dbscan = Dbscan::new(0.4, 3);

    let Some(graph) = mapper.map(&points, &cover, ClusterStep::fit(&dbscan))? else {
        println!("no nodes survived clustering");
        return Ok(());
    };

    println!(
        "n_nodes={} n_edges={} cover_ratio={:.3}",
        graph.n_nodes(),
        graph.n_edges(),
        graph.cover_ratio()
    );
    for (i, component) in graph.components().iter().enumerate() {
        println!("  component {}: {} nodes", i, component.len());
    }

    // Colour nodes by eccentricity, the usual way to read a Mapper graph.
    let ecc = mapper.filter(&points, &[&L1Centrality::new()])?;
    let per_node = graph.aggregate(ecc.view())?;
    for (id, value) in graph.node_keys().zip(per_node.column(0)) {
        println!(
            "  node {:>2}: size {:>3}, eccentricity {:.2}, neighbors {:?}",
            id,
            graph.node_sizes()[id],
            value,
            graph.neighbors(id).collect::<Vec<_>>()
        );
    }

    Ok(())
}
