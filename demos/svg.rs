use plotters::prelude::*;
use voroplane::{BorderEdgeGeneration, TessellationOptions, VoronoiPlane};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_example("voronoi_random.svg", 0)?;
    run_example("voronoi_relaxed.svg", 10)?;
    Ok(())
}

fn run_example(filename: &str, relax_iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root).build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let options = TessellationOptions::default().with_border_edges(BorderEdgeGeneration::MakeBorderEdges);
    let mut plane = VoronoiPlane::new(0.0, 0.0, 100.0, 100.0)?.with_options(options);
    plane.random_sites_seeded(300, rand::random());
    if relax_iterations > 0 {
        plane.relax(relax_iterations, 1.0, false)?;
    }
    plane.tessellate()?;

    // Draw cells
    for site in plane.sites() {
        let mut poly: Vec<(f64, f64)> = site.points().iter().map(|p| (p.x, p.y)).collect();
        if poly.len() < 3 {
            continue;
        }
        chart.draw_series(std::iter::once(Polygon::new(poly.clone(), BLUE.mix(0.1).filled())))?;
        poly.push(poly[0]);
        chart.draw_series(std::iter::once(PathElement::new(poly, BLACK.mix(0.5))))?;
    }

    // Draw sites, marking the ones lying on their own border
    chart.draw_series(plane.sites().iter().map(|s| {
        let color = if s.lies_on_edge().is_some() || s.lies_on_corner().is_some() { GREEN } else { RED };
        Circle::new((s.x(), s.y()), 2, color.filled())
    }))?;

    root.present()?;
    println!("Output saved to {} ({} edges)", filename, plane.count_edges());
    Ok(())
}
