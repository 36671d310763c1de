//! Overlay placement: geometry, the placement engine seam and staleness tracking
//!
//! The dropdown is positioned relative to the input (the *anchor*) by an
//! external [`PlacementEngine`]. Requests are fire-and-forget: the
//! [`OverlayPositioner`] hands out numbered [`PlacementRequest`]s and only
//! accepts a resolution if it is the latest one and the overlay is still
//! visible.

use std::fmt::Debug;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Side of the anchor the overlay ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
}

/// Positioning strategy; only fixed (viewport-relative) is used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Fixed,
}

/// Constraints handed to the placement engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementOptions {
    /// Preferred side; alignment is always start (left edges line up)
    pub preferred: Side,
    pub strategy: Strategy,
    /// Move to the opposite side when the preferred one overflows
    pub flip: bool,
    /// Minimum clearance from the viewport edges along the x axis
    pub shift_margin: f32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            preferred: Side::Bottom,
            strategy: Strategy::Fixed,
            flip: true,
            shift_margin: 5.0,
        }
    }
}

/// Raw engine output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputedPosition {
    pub x: f32,
    pub y: f32,
    pub side: Side,
}

/// Placement exposed to the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    /// The overlay sits above the anchor
    pub flipped: bool,
}

impl From<ComputedPosition> for Placement {
    fn from(position: ComputedPosition) -> Self {
        Self {
            x: position.x,
            y: position.y,
            flipped: position.side == Side::Top,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlacementError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    #[error("placement engine unavailable: {0}")]
    Unavailable(String),
}

/// Everything the engine needs for one computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub generation: u64,
    pub anchor: Rect,
    pub overlay: Size,
    pub viewport: Rect,
    pub options: PlacementOptions,
}

/// Geometry-aware placement engine
///
/// Implementations must be cheap to call from a spawned task; the controller
/// never waits on them while handling events.
pub trait PlacementEngine: Debug + Send + Sync {
    fn compute_placement(
        &self,
        anchor: Rect,
        overlay: Size,
        viewport: Rect,
        options: &PlacementOptions,
    ) -> Result<ComputedPosition, PlacementError>;
}

/// Built-in engine: start-aligned, flips vertically, shifts horizontally
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipShiftEngine;

impl FlipShiftEngine {
    fn y_for(side: Side, anchor: Rect, overlay: Size) -> f32 {
        match side {
            Side::Bottom => anchor.bottom(),
            Side::Top => anchor.y - overlay.height,
        }
    }

    fn overflow(side: Side, anchor: Rect, overlay: Size, viewport: Rect) -> f32 {
        let y = Self::y_for(side, anchor, overlay);
        match side {
            Side::Bottom => (y + overlay.height - viewport.bottom()).max(0.0),
            Side::Top => (viewport.y - y).max(0.0),
        }
    }
}

impl PlacementEngine for FlipShiftEngine {
    fn compute_placement(
        &self,
        anchor: Rect,
        overlay: Size,
        viewport: Rect,
        options: &PlacementOptions,
    ) -> Result<ComputedPosition, PlacementError> {
        if !anchor.is_valid() {
            return Err(PlacementError::InvalidGeometry("anchor"));
        }
        if !viewport.is_valid() {
            return Err(PlacementError::InvalidGeometry("viewport"));
        }
        if !overlay.is_valid() {
            return Err(PlacementError::InvalidGeometry("overlay"));
        }

        let preferred = options.preferred;
        let opposite = match preferred {
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        };

        let preferred_overflow = Self::overflow(preferred, anchor, overlay, viewport);
        let side = if options.flip
            && preferred_overflow > 0.0
            && Self::overflow(opposite, anchor, overlay, viewport) < preferred_overflow
        {
            opposite
        } else {
            preferred
        };

        let min_x = viewport.x + options.shift_margin;
        let max_x = viewport.right() - options.shift_margin - overlay.width;
        let x = if max_x < min_x {
            min_x
        } else {
            anchor.x.clamp(min_x, max_x)
        };

        Ok(ComputedPosition {
            x,
            y: Self::y_for(side, anchor, overlay),
            side,
        })
    }
}

/// Geometry reported by the embedder
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub anchor: Option<Rect>,
    pub overlay: Size,
    pub viewport: Option<Rect>,
}

/// Owns the overlay placement and decides which engine results to keep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayPositioner {
    geometry: Geometry,
    options: PlacementOptions,
    placement: Option<Placement>,
    /// Geometry changed since `placement` was computed
    stale: bool,
    generation: u64,
}

impl OverlayPositioner {
    pub fn new(options: PlacementOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_anchor(&mut self, anchor: Rect) {
        self.stale |= self.geometry.anchor != Some(anchor);
        self.geometry.anchor = Some(anchor);
    }

    pub fn set_overlay(&mut self, overlay: Size) {
        self.stale |= self.geometry.overlay != overlay;
        self.geometry.overlay = overlay;
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.stale |= self.geometry.viewport != Some(viewport);
        self.geometry.viewport = Some(viewport);
    }

    /// A hidden overlay has no pending request that could refresh a stale placement
    fn drop_stale_placement(&mut self) {
        if self.stale && self.placement.take().is_some() {
            debug!("placement dropped: geometry changed while hidden");
        }
    }

    /// Last accepted placement, whether or not it is currently shown
    pub fn last_placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Build a request, or `None` when there is nothing to position
    pub fn reposition(&mut self, visible: bool) -> Option<PlacementRequest> {
        if !visible {
            self.drop_stale_placement();
            return None;
        }
        let (Some(anchor), Some(viewport)) = (self.geometry.anchor, self.geometry.viewport) else {
            debug!("reposition skipped: anchor or viewport not reported yet");
            return None;
        };

        self.generation += 1;
        Some(PlacementRequest {
            generation: self.generation,
            anchor,
            overlay: self.geometry.overlay,
            viewport,
            options: self.options,
        })
    }

    /// Apply an engine result; returns true if the placement changed
    pub fn resolve(
        &mut self,
        generation: u64,
        visible: bool,
        result: &Result<ComputedPosition, PlacementError>,
    ) -> bool {
        if !visible {
            debug!("placement #{} discarded: overlay closed", generation);
            self.drop_stale_placement();
            return false;
        }
        if generation != self.generation {
            debug!(
                "placement #{} discarded: superseded by #{}",
                generation, self.generation
            );
            return false;
        }

        match result {
            Ok(position) => {
                let placement = Placement::from(*position);
                let changed = self.placement != Some(placement);
                self.placement = Some(placement);
                self.stale = false;
                changed
            }
            Err(err) => {
                warn!("placement #{} failed, keeping last placement: {}", generation, err);
                false
            }
        }
    }
}
