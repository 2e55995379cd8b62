//! Terminal render surface: one panel that holds the chart it draws

use crate::charts::{ChartId, ChartSpec, ChartTarget, RenderSurface};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Default)]
pub struct PanelSurface {
    next_id: u64,
    live: Option<(ChartId, ChartSpec)>,
}

impl PanelSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chart currently drawn on this panel
    pub fn chart(&self) -> Option<&ChartSpec> {
        self.live.as_ref().map(|(_, spec)| spec)
    }
}

impl RenderSurface for PanelSurface {
    fn create(&mut self, spec: ChartSpec) -> ChartId {
        if let Some((old, _)) = &self.live {
            warn!("Chart {:?} was still live when a new chart was created", old);
        }
        self.next_id += 1;
        let id = ChartId(self.next_id);
        self.live = Some((id, spec));
        id
    }

    fn destroy(&mut self, id: ChartId) {
        if self.live.as_ref().is_some_and(|(live, _)| *live == id) {
            self.live = None;
        }
    }
}

/// One panel per chart target
pub fn panel_surfaces() -> HashMap<ChartTarget, PanelSurface> {
    ChartTarget::ALL
        .into_iter()
        .map(|target| (target, PanelSurface::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seasonality::SeasonalityComponent;

    #[test]
    fn test_create_and_destroy() {
        let mut surface = PanelSurface::new();
        let spec = ChartSpec::seasonality(SeasonalityComponent::Monthly, &[1.0, 2.0]).unwrap();

        let id = surface.create(spec.clone());
        assert_eq!(surface.chart(), Some(&spec));

        // A stale handle must not clear the current chart
        surface.destroy(ChartId(id.0 + 100));
        assert!(surface.chart().is_some());

        surface.destroy(id);
        assert!(surface.chart().is_none());
    }

    #[test]
    fn test_one_panel_per_target() {
        assert_eq!(panel_surfaces().len(), ChartTarget::ALL.len());
    }
}
