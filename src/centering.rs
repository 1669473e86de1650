//! Popup-aware centering
//!
//! When a store is selected its popup opens anchored to the store's
//! coordinate. If the popup is larger than the space between the map center
//! and the viewport edge it would be clipped, so instead of moving the popup
//! the map center is pushed away from it by the overflow, measured in pixel
//! space and converted back to a coordinate through the map's own projection.

use crate::{
    core::{config::CenteringConfig, geo::LatLng, geo::Point},
    traits::{MapSurface, Projection},
    ui::{
        popup::{AnchorSide, MeasuredSize, PopupPlacement, ViewportSize},
        probe::DimensionsReady,
    },
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CenteringError {
    #[error("popup measurement is unavailable")]
    MeasurementUnavailable,

    #[error("degenerate viewport {width}x{height}")]
    DegenerateViewport { width: f64, height: f64 },
}

/// Projection built from a pair of closures
struct FnProjection<P, U> {
    project: P,
    unproject: U,
}

impl<P, U> Projection for FnProjection<P, U>
where
    P: Fn(LatLng) -> Point,
    U: Fn(Point) -> LatLng,
{
    fn project(&self, lat_lng: LatLng) -> Point {
        (self.project)(lat_lng)
    }

    fn unproject(&self, point: Point) -> LatLng {
        (self.unproject)(point)
    }
}

/// Pixels by which a popup of `size` would overflow when its anchor sits at the viewport center
pub fn centered_overflow(
    anchor: AnchorSide,
    size: MeasuredSize,
    viewport: ViewportSize,
    margin: f64,
) -> f64 {
    if anchor.is_horizontal() {
        size.width - (viewport.width / 2.0 - margin)
    } else {
        size.height - (viewport.height / 2.0 - margin)
    }
}

/// Center that keeps the popup for `target` inside the viewport, using the default distances.
///
/// Pure; any failure falls back to `target` itself.
pub fn compute_corrected_center<P, U>(
    target: LatLng,
    placement: &PopupPlacement,
    size: MeasuredSize,
    project: P,
    unproject: U,
    viewport: ViewportSize,
) -> LatLng
where
    P: Fn(LatLng) -> Point,
    U: Fn(Point) -> LatLng,
{
    let projection = FnProjection { project, unproject };
    try_corrected_center(
        &CenteringConfig::default(),
        target,
        placement,
        Some(size),
        &projection,
        viewport,
    )
    .unwrap_or(target)
}

/// Same as [`compute_corrected_center`] but with explicit distances and reporting why no
/// correction could be computed.
pub fn try_corrected_center(
    config: &CenteringConfig,
    target: LatLng,
    placement: &PopupPlacement,
    size: Option<MeasuredSize>,
    projection: &(impl Projection + ?Sized),
    viewport: ViewportSize,
) -> Result<LatLng, CenteringError> {
    let size = size
        .ok_or(CenteringError::MeasurementUnavailable)?
        .sanitized();

    if viewport.is_degenerate() {
        return Err(CenteringError::DegenerateViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let overflow = centered_overflow(placement.anchor, size, viewport, config.safety_margin);
    if overflow.is_nan() || overflow <= 0.0 {
        return Ok(target);
    }

    let Point { x, y } = projection.project(target);
    let push = overflow + config.clearance_padding;

    let center = if placement.anchor.is_horizontal() {
        let shifted = projection.unproject(Point::new(x - push, y + placement.offset.dy));
        let overflow_lng = match placement.anchor {
            AnchorSide::Left => target.lng - shifted.lng,
            _ => shifted.lng - target.lng,
        };
        LatLng::new(shifted.lat, target.lng + overflow_lng)
    } else {
        let shifted = projection.unproject(Point::new(x - placement.offset.dx, y - push));
        let overflow_lat = match placement.anchor {
            AnchorSide::Top => target.lat - shifted.lat,
            _ => shifted.lat - target.lat,
        };
        LatLng::new(target.lat + overflow_lat, shifted.lng)
    };

    log::debug!(
        "popup {} overflows by {:.1}px, center ({:.6}, {:.6}) -> ({:.6}, {:.6})",
        placement.anchor,
        overflow,
        target.lat,
        target.lng,
        center.lat,
        center.lng
    );
    Ok(center)
}

/// How far the popup for `target` crosses the safety margin under the map's current view
pub fn remaining_overflow(
    view: &(impl Projection + ?Sized),
    target: LatLng,
    placement: &PopupPlacement,
    size: MeasuredSize,
    viewport: ViewportSize,
    margin: f64,
) -> f64 {
    let rect = placement.screen_rect(view.project(target), size);
    placement.overflow(&rect, viewport, margin)
}

/// Whether the popup for `target` lies wholly inside the viewport, `margin` pixels clear of every edge
pub fn popup_fits(
    view: &(impl Projection + ?Sized),
    target: LatLng,
    placement: &PopupPlacement,
    size: MeasuredSize,
    viewport: ViewportSize,
    margin: f64,
) -> bool {
    let rect = placement.screen_rect(view.project(target), size);
    viewport.as_bounds().shrunk(margin).contains_bounds(&rect)
}

/// A selection waiting for its popup to be measured
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMeasurement {
    pub key: String,
    pub target: LatLng,
    pub generation: u64,
    /// Probe render pass expected to deliver the size; unbound until [`CenteringEngine::bind_pass`]
    pub pass: Option<u64>,
}

/// Identifies one measurement request; stale once a newer request is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementTicket {
    pub key: String,
    pub generation: u64,
}

/// Holds the one active measurement request and pans the map once it resolves
#[derive(Debug, Clone)]
pub struct CenteringEngine {
    config: CenteringConfig,
    placement: PopupPlacement,
    generation: u64,
    pending: Option<PendingMeasurement>,
}

impl CenteringEngine {
    pub fn new(placement: PopupPlacement, config: CenteringConfig) -> Self {
        Self {
            config,
            placement,
            generation: 0,
            pending: None,
        }
    }

    pub fn placement(&self) -> &PopupPlacement {
        &self.placement
    }

    pub fn pending(&self) -> Option<&PendingMeasurement> {
        self.pending.as_ref()
    }

    /// Registers a selection; any earlier request is superseded without resolving
    pub fn request(&mut self, key: impl Into<String>, target: LatLng) -> MeasurementTicket {
        self.generation += 1;
        let key = key.into();

        if let Some(previous) = &self.pending {
            log::debug!(
                "measurement {}#{} superseded by {}#{}",
                previous.key,
                previous.generation,
                key,
                self.generation
            );
        }

        self.pending = Some(PendingMeasurement {
            key: key.clone(),
            target,
            generation: self.generation,
            pass: None,
        });
        MeasurementTicket {
            key,
            generation: self.generation,
        }
    }

    /// Ties the request named by `ticket` to the probe render pass that will measure it
    pub fn bind_pass(&mut self, ticket: &MeasurementTicket, pass: u64) -> bool {
        match self.pending.as_mut() {
            Some(p) if p.key == ticket.key && p.generation == ticket.generation => {
                p.pass = Some(pass);
                true
            }
            _ => false,
        }
    }

    /// Drops the pending request, e.g. when the selection is cleared
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("measurement {}#{} cancelled", pending.key, pending.generation);
        }
    }

    pub fn is_current(&self, ticket: &MeasurementTicket) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.key == ticket.key && p.generation == ticket.generation)
    }

    /// Handles a probe notification.
    ///
    /// Only the pass bound to the pending request resolves it; other keys and
    /// older passes of the same key are ignored.
    pub fn on_dimensions_ready<S>(&mut self, ready: &DimensionsReady, surface: &mut S) -> Option<LatLng>
    where
        S: MapSurface + ?Sized,
    {
        let generation = match &self.pending {
            Some(p) if p.key == ready.key && p.pass == Some(ready.pass) => p.generation,
            _ => {
                log::debug!("ignoring stale dimensions for {} pass {}", ready.key, ready.pass);
                return None;
            }
        };
        let ticket = MeasurementTicket {
            key: ready.key.clone(),
            generation,
        };
        self.resolve(&ticket, ready.size, surface)
    }

    /// Resolves the request named by `ticket` with the measured content size and pans the map.
    ///
    /// Returns the center flown to, or `None` if the ticket is stale.
    pub fn resolve<S>(
        &mut self,
        ticket: &MeasurementTicket,
        size: Option<MeasuredSize>,
        surface: &mut S,
    ) -> Option<LatLng>
    where
        S: MapSurface + ?Sized,
    {
        if !self.is_current(ticket) {
            log::debug!(
                "ignoring stale measurement {}#{}",
                ticket.key,
                ticket.generation
            );
            return None;
        }
        let pending = self.pending.take()?;

        let size = size.map(|s| {
            let s = s.sanitized();
            if s == MeasuredSize::zero() {
                s
            } else {
                s.inflated(self.config.measurement_padding)
            }
        });
        let viewport = surface.size();

        let center = match try_corrected_center(
            &self.config,
            pending.target,
            &self.placement,
            size,
            &*surface,
            viewport,
        ) {
            Ok(center) => center,
            Err(e) => {
                log::debug!("{}; centering {} without correction", e, pending.key);
                pending.target
            }
        };

        surface.fly_to(center);

        if let Some(size) = size {
            let overflow = remaining_overflow(
                &*surface,
                pending.target,
                &self.placement,
                size,
                surface.size(),
                self.config.safety_margin,
            );
            let fits = popup_fits(
                &*surface,
                pending.target,
                &self.placement,
                size,
                surface.size(),
                self.config.safety_margin,
            );
            log::debug!(
                "popup {} placed, remaining overflow {:.1}px, fits: {}",
                pending.key,
                overflow,
                fits
            );
        }

        Some(center)
    }
}
