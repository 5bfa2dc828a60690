//! Assembles a complete diagram: validation, sweep, clipping and the per-site
//! outputs.

use rayon::prelude::*;
use tracing::{debug, error, warn};

use crate::bounds::BoundingBox;
use crate::clipper::clip_edges;
use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::grid::ToleranceBuckets;
use crate::plane::{DuplicateSitePolicy, TessellationOptions};
use crate::point::Point;
use crate::site::Site;
use crate::sweep::Builder;

pub(crate) fn validate(sites: &[Site], bounds: &BoundingBox) -> Result<()> {
    for (index, site) in sites.iter().enumerate() {
        let (x, y) = (site.x(), site.y());
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::NonFiniteSite { index });
        }
        if !bounds.contains(x, y) {
            return Err(Error::SiteOutOfBounds { index, x, y });
        }
    }
    Ok(())
}

/// Returns the flags marking later copies of an earlier site.
fn find_duplicates(sites: &[Site], bounds: &BoundingBox, policy: DuplicateSitePolicy) -> Result<Vec<bool>> {
    let mut buckets = ToleranceBuckets::new(bounds);
    let mut duplicate = vec![false; sites.len()];
    for (second, site) in sites.iter().enumerate() {
        let p = site.coords();
        if let Some(first) = buckets.find(p, |j| sites[j].coords()) {
            let [x, y] = sites[first].coords();
            match policy {
                DuplicateSitePolicy::Reject => {
                    return Err(Error::DuplicateSite { first, second, x, y });
                }
                DuplicateSitePolicy::Ignore => {
                    warn!(first, second, x, y, "skipping duplicate site");
                    duplicate[second] = true;
                }
            }
        }
        buckets.insert(second, p);
    }
    Ok(duplicate)
}

/// Fills the polygon and flags of one site from its cell edges.
fn finalize_site(index: usize, site: &mut Site, edges: &[Edge], tolerance: f64) {
    let mut points: Vec<Point> = Vec::with_capacity(site.cell.len() * 2);
    for &e in &site.cell {
        for p in [edges[e].start, edges[e].end] {
            if !points.contains(&p) {
                points.push(p);
            }
        }
    }

    if !points.is_empty() {
        let n = points.len() as f64;
        let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
        let cy = points.iter().map(|p| p.y).sum::<f64>() / n;
        points.sort_by(|a, b| (a.y - cy).atan2(a.x - cx).total_cmp(&(b.y - cy).atan2(b.x - cx)));
    }
    site.points = points;

    let position = site.position();
    let through: Vec<usize> = site
        .cell
        .iter()
        .copied()
        .filter(|&e| edges[e].contains(&position, tolerance))
        .collect();

    match through.as_slice() {
        [] => {}
        [e] => site.lies_on_edge = Some(*e),
        [a, b] => {
            let (a, b) = (&edges[*a], &edges[*b]);
            site.lies_on_corner = [a.start, a.end].into_iter().find(|p| *p == b.start || *p == b.end);
        }
        more => {
            error!(site = index, edges = more.len(), "site lies on more than two cell edges");
            debug_assert!(more.len() <= 2, "site {index} lies on {} cell edges", more.len());
        }
    }
}

/// Tessellates `sites` inside `bounds`, filling their outputs in place.
pub(crate) fn tessellate(sites: &mut [Site], bounds: &BoundingBox, options: &TessellationOptions) -> Result<Vec<Edge>> {
    validate(sites, bounds)?;
    let duplicate = find_duplicates(sites, bounds, options.duplicates)?;

    for (site, dup) in sites.iter_mut().zip(&duplicate) {
        site.reset();
        site.duplicate = *dup;
    }

    let positions: Vec<[f64; 2]> = sites.iter().map(Site::coords).collect();
    let active: Vec<usize> = (0..sites.len()).filter(|&i| !duplicate[i]).collect();

    let raw = Builder::new(&positions, &active, bounds.tolerance()).run();
    let edges = clip_edges(&raw, &positions, &active, bounds, options.border_edges);

    for (i, edge) in edges.iter().enumerate() {
        for site in [edge.left, edge.right].into_iter().flatten() {
            sites[site].cell.push(i);
        }
        if let (Some(l), Some(r)) = (edge.left, edge.right) {
            sites[l].neighbours.push(r);
            sites[r].neighbours.push(l);
        }
    }

    let tolerance = bounds.tolerance();
    sites.par_iter_mut().enumerate().for_each(|(i, site)| {
        site.neighbours.sort_unstable();
        site.neighbours.dedup();
        finalize_site(i, site, &edges, tolerance);
    });

    debug!(
        sites = sites.len(),
        active = active.len(),
        edges = edges.len(),
        border = edges.iter().filter(|e| e.is_border()).count(),
        "tessellation finished"
    );
    Ok(edges)
}
