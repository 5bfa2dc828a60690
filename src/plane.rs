use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

use crate::bounds::BoundingBox;
use crate::cell::{CellPolygon, CellScratch};
use crate::clipper::BorderEdgeGeneration;
use crate::diagram;
use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::grid::SiteGrid;
use crate::site::Site;

/// What to do with a site sitting on top of an earlier one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicateSitePolicy {
    /// Fail with [`Error::DuplicateSite`].
    #[default]
    Reject,
    /// Leave the later site out of the diagram. Its outputs stay empty and
    /// [`Site::is_duplicate`] returns true.
    Ignore,
}

/// Settings of a tessellation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TessellationOptions {
    pub border_edges: BorderEdgeGeneration,
    pub duplicates: DuplicateSitePolicy,
}

impl TessellationOptions {
    pub fn with_border_edges(mut self, border_edges: BorderEdgeGeneration) -> Self {
        self.border_edges = border_edges;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicateSitePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}

/// Tessellates `sites` inside the rectangle and returns the unique edges.
///
/// Each site is updated in place with its cell, polygon and flags. Nothing is
/// kept between calls.
pub fn tessellate_once(
    sites: &mut [Site],
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    mode: BorderEdgeGeneration,
) -> Result<Vec<Edge>> {
    let bounds = BoundingBox::from_extents(min_x, min_y, max_x, max_y)?;
    let options = TessellationOptions::default().with_border_edges(mode);
    diagram::tessellate(sites, &bounds, &options)
}

/// Tessellates independent planes in parallel. Stops at the first failure.
pub fn tessellate_all(planes: &mut [VoronoiPlane]) -> Result<()> {
    planes.par_iter_mut().try_for_each(|plane| plane.tessellate().map(|_| ()))
}

/// Nearest-site lookup over the current site positions.
struct SiteIndex {
    positions: Vec<[f64; 2]>,
    grid: SiteGrid,
}

impl SiteIndex {
    fn new(bounds: &BoundingBox, sites: &[Site]) -> Self {
        let positions: Vec<[f64; 2]> = sites.iter().map(Site::coords).collect();
        let all: Vec<usize> = (0..positions.len()).collect();
        let grid = SiteGrid::new(bounds, &positions, &all);
        Self { positions, grid }
    }
}

/// A rectangle with a set of sites and their last computed diagram.
///
/// # Example
///
/// ```
/// use voroplane::{BorderEdgeGeneration, TessellationOptions, VoronoiPlane};
///
/// let options = TessellationOptions::default().with_border_edges(BorderEdgeGeneration::MakeBorderEdges);
/// let mut plane = VoronoiPlane::new(0.0, 0.0, 100.0, 100.0)?.with_options(options);
/// plane.set_sites([[25.0, 50.0], [75.0, 50.0]])?;
/// plane.tessellate()?;
/// assert_eq!(plane.count_edges(), 7);
/// assert_eq!(plane.site(0).map(|s| s.points().len()), Some(4));
/// # Ok::<(), voroplane::Error>(())
/// ```
pub struct VoronoiPlane {
    bounds: BoundingBox,
    options: TessellationOptions,
    sites: Vec<Site>,
    edges: Vec<Edge>,
    index: SiteIndex,
}

impl VoronoiPlane {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let bounds = BoundingBox::from_extents(min_x, min_y, max_x, max_y)?;
        Ok(Self {
            bounds,
            options: TessellationOptions::default(),
            sites: Vec::new(),
            edges: Vec::new(),
            index: SiteIndex::new(&bounds, &[]),
        })
    }

    pub fn with_options(mut self, options: TessellationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: TessellationOptions) {
        self.options = options;
    }

    /// Replaces the sites. The previous diagram is discarded.
    pub fn set_sites<S: Into<Site>>(&mut self, sites: impl IntoIterator<Item = S>) -> Result<()> {
        let sites: Vec<Site> = sites.into_iter().map(Into::into).collect();
        diagram::validate(&sites, &self.bounds)?;
        self.index = SiteIndex::new(&self.bounds, &sites);
        self.sites = sites;
        self.edges.clear();
        Ok(())
    }

    /// Replaces the sites from a flat `[x0, y0, x1, y1, ...]` array. A trailing
    /// odd value is ignored.
    pub fn set_site_positions(&mut self, coords: &[f64]) -> Result<()> {
        self.set_sites(coords.chunks_exact(2).map(|c| [c[0], c[1]]))
    }

    /// Replaces the sites with `count` uniformly distributed ones.
    pub fn random_sites(&mut self, count: usize) {
        self.random_sites_seeded(count, get_seed());
    }

    pub fn random_sites_seeded(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let w = self.bounds.width();
        let h = self.bounds.height();
        let sites: Vec<Site> = (0..count)
            .map(|_| {
                let x = self.bounds.min[0] + rng.r#gen::<f64>() * w;
                let y = self.bounds.min[1] + rng.r#gen::<f64>() * h;
                Site::new(x, y)
            })
            .collect();
        self.index = SiteIndex::new(&self.bounds, &sites);
        self.sites = sites;
        self.edges.clear();
    }

    /// Computes the diagram of the current sites.
    pub fn tessellate(&mut self) -> Result<&[Edge]> {
        self.edges = diagram::tessellate(&mut self.sites, &self.bounds, &self.options)?;
        Ok(&self.edges)
    }

    /// Lloyd relaxation: moves every site `strength` of the way towards the
    /// centroid of its closed cell, `iterations` times.
    ///
    /// The diagram is recomputed afterwards if `re_tessellate` is set and
    /// discarded otherwise.
    pub fn relax(&mut self, iterations: usize, strength: f64, re_tessellate: bool) -> Result<()> {
        if !(strength > 0.0 && strength <= 1.0) {
            return Err(Error::InvalidRelaxation(strength));
        }

        for iteration in 0..iterations {
            diagram::tessellate(&mut self.sites, &self.bounds, &self.options)?;

            let positions: Vec<[f64; 2]> = self.sites.iter().map(Site::coords).collect();
            let bounds = &self.bounds;
            let moved: Vec<[f64; 2]> = self
                .sites
                .par_iter()
                .enumerate()
                .map_init(CellScratch::default, |scratch, (i, site)| {
                    let old = positions[i];
                    if site.is_duplicate() {
                        return old;
                    }
                    let cell = CellPolygon::build(i, &positions, site.neighbours().iter().copied(), bounds, scratch);
                    match cell.centroid() {
                        Some(c) => [
                            (old[0] + strength * (c[0] - old[0])).clamp(bounds.min[0], bounds.max[0]),
                            (old[1] + strength * (c[1] - old[1])).clamp(bounds.min[1], bounds.max[1]),
                        ],
                        None => old,
                    }
                })
                .collect();

            let max_shift = positions
                .iter()
                .zip(&moved)
                .map(|(a, b)| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt())
                .fold(0.0, f64::max);
            debug!(iteration, max_shift, "relaxation step");

            for (site, p) in self.sites.iter_mut().zip(&moved) {
                site.set_position(p[0], p[1]);
            }
        }

        self.index = SiteIndex::new(&self.bounds, &self.sites);
        self.edges.clear();
        if re_tessellate {
            self.tessellate()?;
        }
        Ok(())
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn count_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn count_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn options(&self) -> &TessellationOptions {
        &self.options
    }

    /// Index of the site closest to `(x, y)`, which is the cell containing it.
    pub fn nearest_site(&self, x: f64, y: f64) -> Option<usize> {
        self.index.grid.nearest(&self.index.positions, [x, y])
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sites_are_inside() {
        let mut plane = VoronoiPlane::new(-10.0, 5.0, 10.0, 25.0).unwrap();
        plane.random_sites(200);
        assert_eq!(plane.count_sites(), 200);
        assert!(plane.sites().iter().all(|s| plane.bounds().contains(s.x(), s.y())));
        plane.tessellate().unwrap();
        assert!(plane.count_edges() > 200);
    }

    #[test]
    fn test_seeded_sites_are_reproducible() {
        let mut a = VoronoiPlane::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let mut b = VoronoiPlane::new(0.0, 0.0, 1.0, 1.0).unwrap();
        a.random_sites_seeded(10, 42);
        b.random_sites_seeded(10, 42);
        let pa: Vec<f64> = a.sites().iter().map(Site::x).collect();
        let pb: Vec<f64> = b.sites().iter().map(Site::x).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_set_sites_validates() {
        let mut plane = VoronoiPlane::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(matches!(
            plane.set_site_positions(&[1.0, 1.0, 11.0, 1.0]),
            Err(Error::SiteOutOfBounds { index: 1, .. })
        ));
        assert_eq!(plane.count_sites(), 0);
        plane.set_site_positions(&[1.0, 1.0, 9.0, 1.0, 5.0]).unwrap();
        assert_eq!(plane.count_sites(), 2);
    }

    #[test]
    fn test_nearest_site() {
        let mut plane = VoronoiPlane::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(plane.nearest_site(5.0, 5.0), None);
        plane.set_sites([[1.0, 1.0], [9.0, 9.0], [1.0, 9.0]]).unwrap();
        assert_eq!(plane.nearest_site(0.0, 0.0), Some(0));
        assert_eq!(plane.nearest_site(8.0, 7.0), Some(1));
        assert_eq!(plane.nearest_site(2.0, 8.0), Some(2));
    }

    #[test]
    fn test_relax_rejects_bad_strength() {
        let mut plane = VoronoiPlane::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(plane.relax(1, 0.0, false), Err(Error::InvalidRelaxation(0.0)));
        assert_eq!(plane.relax(1, 1.5, false), Err(Error::InvalidRelaxation(1.5)));
        assert!(plane.relax(1, f64::NAN, false).is_err());
    }

    #[test]
    fn test_tessellate_all() {
        let mut planes: Vec<VoronoiPlane> = (0..4)
            .map(|k| {
                let mut plane = VoronoiPlane::new(0.0, 0.0, 100.0, 100.0).unwrap();
                plane.random_sites_seeded(50, k);
                plane
            })
            .collect();
        tessellate_all(&mut planes).unwrap();
        assert!(planes.iter().all(|p| p.count_edges() > 0));
    }
}
