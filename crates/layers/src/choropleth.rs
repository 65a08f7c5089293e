use catalog::CountryCode;
use foundation::Rgba8;
use tracing::debug;
use values::ValueStore;

use crate::raster::RasterBuffer;
use crate::symbology::{NeutralCoverage, ViewStyle};
use crate::vector::{ProjectedView, fill_path, stroke_path};

/// Colors for every nonzero entry of a store, captured once per render pass
/// so both views paint from the same data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoroplethPlan {
    entries: Vec<(CountryCode, Rgba8)>,
}

impl ChoroplethPlan {
    pub fn from_store(store: &ValueStore) -> Self {
        let entries = store
            .all_entries()
            .into_iter()
            .filter_map(|(code, value)| store.scale().color_for(value).map(|c| (code, c)))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(CountryCode, Rgba8)] {
        &self.entries
    }

    pub fn color_for(&self, code: CountryCode) -> Option<Rgba8> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, color)| *color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Paints ocean, stipple, neutral land and value colors for one view.
#[derive(Debug, Clone, Default)]
pub struct ChoroplethCompositor {
    style: ViewStyle,
    coverage: NeutralCoverage,
}

impl ChoroplethCompositor {
    pub fn new(style: ViewStyle, coverage: NeutralCoverage) -> Self {
        Self { style, coverage }
    }

    pub fn compose(
        &self,
        view: &ProjectedView,
        stipple: &RasterBuffer,
        plan: &ChoroplethPlan,
    ) -> RasterBuffer {
        let style = &self.style;
        let opacity = style.overlay_opacity;
        let mut out = view.raster();

        out.fill(style.ocean, 1.0);
        out.draw_over(stipple, 1.0);

        let registry = view.registry();
        for (feature, path) in registry.features().iter().zip(view.paths()) {
            let neutral = match self.coverage {
                NeutralCoverage::AllFeatures => true,
                NeutralCoverage::ResolvedOnly => feature.code.is_some(),
            };
            if neutral {
                fill_path(&mut out, path, style.neutral_fill, opacity);
            }
        }

        let mut painted = 0usize;
        for (code, color) in plan.entries() {
            let Some(path) = view.path_for(*code) else {
                continue;
            };
            fill_path(&mut out, path, *color, opacity);
            stroke_path(&mut out, path, style.stroke.color, style.stroke.width, opacity);
            painted += 1;
        }

        debug!(
            width = out.width(),
            height = out.height(),
            planned = plan.len(),
            painted,
            "choropleth composed"
        );
        out
    }
}
