use std::sync::Arc;

use catalog::CountryRegistry;
use foundation::math::Projection;
use layers::ProjectedView;
use tracing::debug;

use crate::surface::Viewport;

/// Owns the two projected views of the registry.
///
/// The sphere view is fixed for the engine's lifetime; only the flat view is
/// ever rebuilt.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    sphere: ProjectedView,
    flat: ProjectedView,
}

impl ProjectionEngine {
    pub fn new(registry: Arc<CountryRegistry>, sphere: Viewport, flat: Viewport) -> Self {
        Self {
            sphere: equirectangular_view(Arc::clone(&registry), sphere),
            flat: mercator_view(registry, flat),
        }
    }

    pub fn registry(&self) -> &Arc<CountryRegistry> {
        self.sphere.registry()
    }

    pub fn sphere(&self) -> &ProjectedView {
        &self.sphere
    }

    pub fn flat(&self) -> &ProjectedView {
        &self.flat
    }

    pub fn flat_viewport(&self) -> Viewport {
        Viewport::new(self.flat.width(), self.flat.height())
    }

    /// Refit the flat projection. Returns `false` (and changes nothing) for
    /// empty viewports or an unchanged size.
    pub fn resize_flat(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            debug!(%viewport, "ignoring empty flat viewport");
            return false;
        }
        if viewport == self.flat_viewport() {
            return false;
        }
        self.flat = mercator_view(Arc::clone(self.registry()), viewport);
        true
    }
}

fn equirectangular_view(registry: Arc<CountryRegistry>, size: Viewport) -> ProjectedView {
    let projection = Projection::equirectangular_fit(size.width, size.height);
    ProjectedView::new(registry, projection, size.width, size.height)
}

fn mercator_view(registry: Arc<CountryRegistry>, size: Viewport) -> ProjectedView {
    let projection = Projection::mercator_fit(size.width, size.height);
    ProjectedView::new(registry, projection, size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::ProjectionEngine;
    use crate::surface::Viewport;
    use crate::test_support::{USA, registry};
    use foundation::math::{LonLat, ProjectionKind};

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(registry(), Viewport::new(256, 128), Viewport::new(300, 200))
    }

    #[test]
    fn builds_one_view_per_projection() {
        let e = engine();
        assert_eq!(e.sphere().projection().kind, ProjectionKind::Equirectangular);
        assert_eq!(e.flat().projection().kind, ProjectionKind::Mercator);
        assert!(e.sphere().path_for(USA).is_some());
        assert!(e.flat().path_for(USA).is_some());
    }

    #[test]
    fn resize_rebuilds_only_the_flat_view() {
        let mut e = engine();
        let sphere_key = e.sphere().projection().key();
        let usa_before = e.sphere().path_for(USA).cloned();

        assert!(e.resize_flat(Viewport::new(640, 400)));
        assert_eq!(e.flat_viewport(), Viewport::new(640, 400));
        assert_eq!(e.sphere().projection().key(), sphere_key);
        assert_eq!(e.sphere().path_for(USA).cloned(), usa_before);

        let centre = e.flat().projection().project(LonLat::new(0.0, 0.0));
        assert_eq!((centre.x, centre.y), (320.0, 200.0));
    }

    #[test]
    fn empty_or_unchanged_sizes_are_ignored() {
        let mut e = engine();
        let key = e.flat().projection().key();
        assert!(!e.resize_flat(Viewport::new(0, 400)));
        assert!(!e.resize_flat(Viewport::new(640, 0)));
        assert!(!e.resize_flat(Viewport::new(300, 200)));
        assert_eq!(e.flat().projection().key(), key);
    }
}
