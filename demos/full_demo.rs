//! Complete workflow demonstration for district_gen

use district_gen::*;

fn rect(min: Point, max: Point) -> Vec<Point> {
    Polygon::rect(min, max).vertices
}

fn main() -> Result<()> {
    println!("=== district_gen Complete Demo ===\n");

    // Step 1: Configure generation
    println!("Step 1: Configuring generation...");
    let config = GenerationConfigBuilder::new()
        .cell_size(28.0, 40.0)?
        .allow_rotation(true)
        .lloyd(LloydOptions {
            max_iterations: 3,
            convergence_threshold: 0.01,
        })?
        .build();
    println!("  Block inset: {}, lot inset: {}", config.block_inset, config.lot_inset);
    println!(
        "  Lot cells: {}..{}",
        config.block_options.cell_size_min, config.block_options.cell_size_max
    );

    // Step 2: Lay out districts
    println!("\nStep 2: Placing districts...");
    let mut world = WorldGen::new();

    let mut downtown =
        VoronoiDistrict::new(rect(Point::ZERO, Point::splat(400.0)), Point::splat(200.0), 12345)?
            .with_config(config);
    downtown.add_circle(Point::splat(200.0), 60.0, 0.2, 6);
    downtown.add_site(Point::new(60.0, 340.0), false, true, 45.0);
    let scattered = downtown.add_random_sites(30, 99);
    println!("  Downtown: {} sites ({} random)", downtown.sites().len(), scattered);

    let mut harbour = VoronoiDistrict::new(
        vec![
            Point::new(480.0, 0.0),
            Point::new(760.0, 40.0),
            Point::new(720.0, 360.0),
            Point::new(500.0, 300.0),
        ],
        Point::new(615.0, 175.0),
        777,
    )?
    .with_config(config);
    harbour.add_random_sites(18, 5);
    harbour.district.set_spawn(Point::new(600.0, 120.0));
    println!("  Harbour: {} sites", harbour.sites().len());

    let downtown_id = world.add_district(downtown);
    let harbour_id = world.add_district(harbour);

    // Step 3: Bridge the districts
    println!("\nStep 3: Building bridges...");
    world.connect(
        BridgeEnd::new(downtown_id, 1, 0.4),
        BridgeEnd::new(harbour_id, 3, 0.7),
    )?;
    for bridge in world.bridges() {
        println!("  {:?} -> {:?}", bridge.bridge_path[0], bridge.bridge_path[1]);
    }

    // Step 4: Generate
    println!("\nStep 4: Generating world...");
    world.generate_world_with(&PerlinHeight::new(12345, 8.0, 60.0));
    for (id, d) in world.districts().iter().enumerate() {
        let tallest = d
            .district
            .lots()
            .map(|lot| lot.build_height)
            .fold(0.0, f64::max);
        println!(
            "  District {}: {} blocks, {} lots, {} curbs, {} roads, tallest {:.1}",
            id,
            d.district.blocks.len(),
            d.district.lot_count(),
            d.district.curbs.len(),
            d.district.roads.len(),
            tallest
        );
    }
    println!("  Total lots: {}", world.lot_count());

    // Step 5: Spatial queries
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 5: Spatial queries:");
        if let Some(d) = world.district(harbour_id) {
            let spawn = d.district.spawn;
            if let Some(block) = d.district.find_block_at(spawn) {
                println!(
                    "  Harbour spawn {:?} -> block {} ({} lots)",
                    spawn,
                    block,
                    d.district.blocks[block].lot_count()
                );
            }
        }
    }

    // Step 6: Serialise
    println!("\nStep 6: Serialising...");
    let definition = world.serialise();
    println!(
        "  {} districts, {} bridges",
        definition.districts.len(),
        definition.bridges.len()
    );

    #[cfg(feature = "serde")]
    {
        let json = serde_json::to_string(&definition).map_err(|e| {
            WorldGenError::InvalidConfig(format!("world definition is not serialisable: {}", e))
        })?;
        println!("  JSON size: {:.1} KB", json.len() as f64 / 1024.0);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
