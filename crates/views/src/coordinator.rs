use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use catalog::{CountryCodeResolver, CountryRegistry};
use layers::{
    CacheLookup, ChoroplethCompositor, ChoroplethPlan, ProjectedView, StippleCache,
    StippleMaskRenderer, StippleStyle, Symbology,
};
use runtime::{ListenerId, Metrics};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use values::{ValueChange, ValueStore};

use crate::error::{InitError, RenderError};
use crate::projection_engine::ProjectionEngine;
use crate::source::FeatureSource;
use crate::surface::{CanvasSurface, TextureSurface, Viewport};

pub const DEFAULT_SPHERE_SIZE: Viewport = Viewport::new(2048, 1024);

/// Render settings shared by both views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Equirectangular texture size; fixed once initialized.
    pub sphere_size: Viewport,
    pub stipple: StippleStyle,
    pub symbology: Symbology,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sphere_size: DEFAULT_SPHERE_SIZE,
            stipple: StippleStyle::default(),
            symbology: Symbology::default(),
        }
    }
}

struct Ready {
    engine: ProjectionEngine,
    stipples: StippleCache,
}

enum State {
    Uninitialized,
    Ready(Box<Ready>),
}

/// Drives the sphere texture and the flat canvas from one [`ValueStore`].
///
/// Every value notification recomposes both rasters from a single
/// [`ChoroplethPlan`], so a country never shows different colors in the two
/// views. A flat resize touches only the flat view.
pub struct DualViewCoordinator<T, C> {
    resolver: CountryCodeResolver,
    settings: RenderSettings,
    sphere_compositor: ChoroplethCompositor,
    flat_compositor: ChoroplethCompositor,
    texture: T,
    canvas: C,
    state: State,
    metrics: Metrics,
}

impl<T: TextureSurface, C: CanvasSurface> DualViewCoordinator<T, C> {
    pub fn new(
        resolver: CountryCodeResolver,
        settings: RenderSettings,
        texture: T,
        canvas: C,
    ) -> Self {
        let Symbology {
            sphere,
            flat,
            neutral_coverage,
        } = settings.symbology;
        Self {
            resolver,
            sphere_compositor: ChoroplethCompositor::new(sphere, neutral_coverage),
            flat_compositor: ChoroplethCompositor::new(flat, neutral_coverage),
            settings,
            texture,
            canvas,
            state: State::Uninitialized,
            metrics: Metrics::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn engine(&self) -> Option<&ProjectionEngine> {
        match &self.state {
            State::Ready(ready) => Some(&ready.engine),
            State::Uninitialized => None,
        }
    }

    pub fn registry(&self) -> Option<&Arc<CountryRegistry>> {
        self.engine().map(ProjectionEngine::registry)
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn texture(&self) -> &T {
        &self.texture
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Load features, build both projections and publish the first pair of
    /// rasters. Runs at most once successfully; a failed attempt leaves the
    /// coordinator uninitialized.
    pub async fn initialize<S: FeatureSource>(
        &mut self,
        source: &S,
        store: &ValueStore,
    ) -> Result<(), InitError> {
        if self.is_ready() {
            return Err(InitError::AlreadyInitialized);
        }

        let chunk = source.load_features().await?;
        let registry = CountryRegistry::build(&chunk, &self.resolver);
        if registry.is_empty() {
            return Err(InitError::EmptyRegistry);
        }

        let flat = self.canvas.viewport();
        let engine = ProjectionEngine::new(Arc::new(registry), self.settings.sphere_size, flat);
        let stipples = StippleCache::new(StippleMaskRenderer::new(self.settings.stipple));
        self.state = State::Ready(Box::new(Ready { engine, stipples }));
        self.record_flat_size(flat);

        info!(
            sphere = %self.settings.sphere_size,
            %flat,
            "dual view coordinator ready"
        );
        Ok(self.regenerate_all(store)?)
    }

    /// Recompose both rasters from the current store contents.
    pub fn on_values_changed(&mut self, store: &ValueStore) -> Result<(), RenderError> {
        self.regenerate_all(store)
    }

    /// Refit the flat projection to the canvas viewport and repaint it.
    /// Returns `Ok(false)` when the viewport is empty or unchanged.
    pub fn on_flat_resized(&mut self, store: &ValueStore) -> Result<bool, RenderError> {
        let viewport = self.canvas.viewport();
        let State::Ready(ready) = &mut self.state else {
            return Err(RenderError::NotReady);
        };
        if !ready.engine.resize_flat(viewport) {
            return Ok(false);
        }
        self.record_flat_size(viewport);
        self.regenerate_flat(store)?;
        Ok(true)
    }

    pub fn regenerate_all(&mut self, store: &ValueStore) -> Result<(), RenderError> {
        let plan = ChoroplethPlan::from_store(store);
        self.publish_sphere(&plan)?;
        self.publish_flat(&plan)
    }

    pub fn regenerate_sphere(&mut self, store: &ValueStore) -> Result<(), RenderError> {
        self.publish_sphere(&ChoroplethPlan::from_store(store))
    }

    pub fn regenerate_flat(&mut self, store: &ValueStore) -> Result<(), RenderError> {
        self.publish_flat(&ChoroplethPlan::from_store(store))
    }

    fn publish_sphere(&mut self, plan: &ChoroplethPlan) -> Result<(), RenderError> {
        let State::Ready(ready) = &mut self.state else {
            return Err(RenderError::NotReady);
        };
        let Ready { engine, stipples } = &mut **ready;
        if is_degenerate(engine.sphere()) {
            debug!("sphere texture has zero size, upload skipped");
            return Ok(());
        }
        let raster = compose(
            &self.sphere_compositor,
            engine.sphere(),
            stipples,
            plan,
            &mut self.metrics,
        );
        self.metrics.inc("render.sphere");
        self.texture.upload_texture(raster);
        Ok(())
    }

    fn publish_flat(&mut self, plan: &ChoroplethPlan) -> Result<(), RenderError> {
        let State::Ready(ready) = &mut self.state else {
            return Err(RenderError::NotReady);
        };
        let Ready { engine, stipples } = &mut **ready;
        if is_degenerate(engine.flat()) {
            debug!("flat canvas has zero size, paint skipped");
            return Ok(());
        }
        let raster = compose(
            &self.flat_compositor,
            engine.flat(),
            stipples,
            plan,
            &mut self.metrics,
        );
        self.metrics.inc("render.flat");
        self.canvas.paint(raster);
        Ok(())
    }

    fn record_flat_size(&mut self, viewport: Viewport) {
        self.metrics.set_gauge("flat.width", viewport.width as i64);
        self.metrics.set_gauge("flat.height", viewport.height as i64);
    }

    fn handle_notification(&mut self, store: &ValueStore, changes: &[ValueChange]) {
        self.metrics.inc("values.notifications");
        match self.on_values_changed(store) {
            Ok(()) => debug!(changes = changes.len(), "views refreshed"),
            Err(RenderError::NotReady) => {
                debug!(changes = changes.len(), "value change before initialization, skipped")
            }
        }
    }
}

impl<T: TextureSurface + 'static, C: CanvasSurface + 'static> DualViewCoordinator<T, C> {
    /// Subscribe `this` to `store`. The listener holds a weak reference, so
    /// dropping the coordinator silently ends updates.
    ///
    /// Never hold a borrow of the coordinator across a store mutation: a
    /// notification that finds it borrowed is dropped and both views keep
    /// their previous rasters.
    pub fn attach(this: &Rc<RefCell<Self>>, store: &mut ValueStore) -> ListenerId {
        let weak = Rc::downgrade(this);
        store.subscribe(move |store, changes| {
            let Some(coordinator) = weak.upgrade() else {
                return;
            };
            let Ok(mut coordinator) = coordinator.try_borrow_mut() else {
                warn!("coordinator busy, value notification dropped");
                return;
            };
            coordinator.handle_notification(store, changes);
        })
    }
}

fn is_degenerate(view: &ProjectedView) -> bool {
    view.width() == 0 || view.height() == 0
}

fn compose(
    compositor: &ChoroplethCompositor,
    view: &ProjectedView,
    stipples: &mut StippleCache,
    plan: &ChoroplethPlan,
    metrics: &mut Metrics,
) -> layers::RasterBuffer {
    let (stipple, lookup) = stipples.stipple_for(view);
    metrics.inc(match lookup {
        CacheLookup::Hit => "stipple.cache_hit",
        CacheLookup::Miss => "stipple.cache_miss",
    });
    compositor.compose(view, stipple, plan)
}
