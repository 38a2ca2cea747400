//! Builds the C5G7 core and resolves a few points through it.
//!
//! ```text
//! cargo run --example c5g7                  # plain core
//! cargo run --example c5g7 -- gap rodded    # gapped core, rods in the inner assembly
//! ```

mod model;

use csgeo::math::{Face, Point3};
use csgeo::{CsgError, GeometryOptions};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use model::{materials, Configuration};

fn main() -> Result<(), CsgError> {
    // Default: WARN for everything, INFO for csgeo and this example.
    // Override with RUST_LOG (e.g. RUST_LOG=csgeo=debug).
    let env_filter = EnvFilter::from_default_env()
        .add_directive(LevelFilter::WARN.into())
        .add_directive("c5g7=info".parse().unwrap_or_default())
        .add_directive("csgeo=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Configuration {
        gap: args.iter().any(|a| a == "gap"),
        rodded: args.iter().any(|a| a == "rodded"),
    };
    info!("Building C5G7 core with {config:?}");

    let options = GeometryOptions::default().with_tiling_samples([32, 32, 1]);
    let geometry = model::build(config)?.finalize(options)?;

    for face in Face::ALL {
        info!("Boundary {face:?}: {:?}", geometry.boundary(face));
    }

    let pitch = model::ASSEMBLY_WIDTH + if config.gap { 2.0 * model::GAP_WIDTH } else { 0.0 };
    let points = [
        Point3::new(-pitch, pitch, 0.0),
        Point3::new(-pitch - 3.78, pitch + 7.56, 0.0),
        Point3::new(-pitch - 10.08, pitch + 10.08, 0.0),
        Point3::new(-10.08, pitch + 10.08, 0.0),
        Point3::new(pitch, -pitch, 0.0),
    ];
    for point in &points {
        let chain = geometry.find_cell_containing_point(point)?;
        let cells: Vec<&str> = chain
            .cells()
            .filter_map(|(_, cell)| geometry.cell(cell).ok().map(|c| c.name.as_str()))
            .collect();
        info!(
            "({:.2}, {:.2}) -> {} via {}",
            point.x,
            point.y,
            materials::name(chain.material()),
            cells.join(" / ")
        );
    }

    let fissionable = geometry.compute_fissionability(&materials::is_fissionable)?;
    let count = fissionable.values().filter(|&&f| f).count();
    info!("{count} of {} universes contain fissionable material", fissionable.len());
    Ok(())
}
