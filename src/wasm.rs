use crate::clipper::BorderEdgeGeneration;
use crate::plane::VoronoiPlane;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// JavaScript view of a [`VoronoiPlane`]. Points cross the boundary as flat
/// `[x, y, x, y, ...]` arrays.
#[wasm_bindgen(js_name = VoronoiPlane)]
pub struct VoronoiPlaneWasm {
    inner: VoronoiPlane,
}

#[wasm_bindgen(js_class = VoronoiPlane)]
impl VoronoiPlaneWasm {
    #[wasm_bindgen(constructor)]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<VoronoiPlaneWasm, JsError> {
        Ok(VoronoiPlaneWasm { inner: VoronoiPlane::new(min_x, min_y, max_x, max_y)? })
    }

    pub fn set_sites(&mut self, coords: &[f64]) -> Result<(), JsError> {
        Ok(self.inner.set_site_positions(coords)?)
    }

    pub fn random_sites(&mut self, count: usize) {
        self.inner.random_sites(count);
    }

    pub fn set_border_edges(&mut self, enabled: bool) {
        let mode = if enabled {
            BorderEdgeGeneration::MakeBorderEdges
        } else {
            BorderEdgeGeneration::DoNotMakeBorderEdges
        };
        let options = self.inner.options().with_border_edges(mode);
        self.inner.set_options(options);
    }

    /// Computes the diagram and returns its edges as `[x1, y1, x2, y2, ...]`.
    pub fn tessellate(&mut self) -> Result<Vec<f64>, JsError> {
        let edges = self.inner.tessellate()?;
        Ok(edges
            .iter()
            .flat_map(|e| [e.start.x, e.start.y, e.end.x, e.end.y])
            .collect())
    }

    pub fn relax(&mut self, iterations: usize, strength: f64, re_tessellate: bool) -> Result<(), JsError> {
        Ok(self.inner.relax(iterations, strength, re_tessellate)?)
    }

    #[wasm_bindgen(getter)]
    pub fn count_sites(&self) -> usize { self.inner.count_sites() }
    #[wasm_bindgen(getter)]
    pub fn count_edges(&self) -> usize { self.inner.count_edges() }
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> { self.inner.sites().iter().flat_map(|s| [s.x(), s.y()]).collect() }

    pub fn site_points(&self, index: usize) -> Vec<f64> {
        self.inner
            .site(index)
            .map(|s| s.points().iter().flat_map(|p| [p.x, p.y]).collect())
            .unwrap_or_default()
    }

    pub fn site_neighbours(&self, index: usize) -> Vec<u32> {
        self.inner
            .site(index)
            .map(|s| s.neighbours().iter().map(|&n| n as u32).collect())
            .unwrap_or_default()
    }

    pub fn lies_on_edge(&self, index: usize) -> Option<u32> {
        self.inner.site(index)?.lies_on_edge().map(|e| e as u32)
    }

    pub fn lies_on_corner(&self, index: usize) -> Option<Vec<f64>> {
        self.inner.site(index)?.lies_on_corner().map(|p| vec![p.x, p.y])
    }

    pub fn nearest_site(&self, x: f64, y: f64) -> Option<u32> {
        self.inner.nearest_site(x, y).map(|i| i as u32)
    }
}
