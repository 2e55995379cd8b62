//! Live chart bookkeeping
//!
//! Tracks which chart is live on each target so a new chart never stacks on
//! top of an old one.

use super::{ChartId, ChartSpec, ChartTarget, RenderSurface};
use crate::seasonality::SeasonalityComponent;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ChartRegistry {
    live: HashMap<ChartTarget, ChartId>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy the live chart on `target` (if any), then create `spec`
    pub fn replace<S: RenderSurface>(
        &mut self,
        target: ChartTarget,
        surface: &mut S,
        spec: ChartSpec,
    ) -> ChartId {
        if let Some(previous) = self.live.remove(&target) {
            surface.destroy(previous);
        }
        let id = surface.create(spec);
        self.live.insert(target, id);
        id
    }

    /// Destroy every live chart whose surface is known
    pub fn destroy_all<S: RenderSurface>(&mut self, surfaces: &mut HashMap<ChartTarget, S>) {
        for (target, id) in self.live.drain() {
            if let Some(surface) = surfaces.get_mut(&target) {
                surface.destroy(id);
            }
        }
    }

    pub fn live(&self, target: ChartTarget) -> Option<ChartId> {
        self.live.get(&target).copied()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Draw one chart per present, non-empty seasonality component.
///
/// Absent or empty components and missing surfaces are skipped; the other
/// components still render. Returns the components that were drawn.
pub fn render_seasonality<S: RenderSurface>(
    registry: &mut ChartRegistry,
    surfaces: &mut HashMap<ChartTarget, S>,
    seasonality: &BTreeMap<String, Vec<f64>>,
) -> Vec<SeasonalityComponent> {
    for name in seasonality.keys() {
        if SeasonalityComponent::from_name(name).is_none() {
            debug!("Ignoring unknown seasonality component {:?}", name);
        }
    }

    let mut rendered = Vec::new();

    for component in SeasonalityComponent::ALL {
        let Some(raw) = seasonality.get(component.name()) else {
            continue;
        };
        let Some(spec) = ChartSpec::seasonality(component, raw) else {
            continue;
        };

        let target = ChartTarget::Seasonality(component);
        let Some(surface) = surfaces.get_mut(&target) else {
            debug!("No render target {}, skipping {} chart", target, component);
            continue;
        };

        registry.replace(target, surface, spec);
        rendered.push(component);
    }

    rendered
}
