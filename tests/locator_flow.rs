use std::{cell::Cell, rc::Rc};
use storemap::prelude::*;

/// End-to-end flows: results arrive, a store is picked, the popup is measured, the map moves
#[cfg(test)]
mod locator_flow {
    use super::*;

    const STORES: &str = r#"[
        {"id": 1, "slug": "soho", "name": "SoHo", "coordinates": {"latitude": 40.7233, "longitude": -74.0030},
         "address": ["451 Broadway", "New York, NY 10013"], "phone": "(212) 555-0101"},
        {"id": 2, "slug": "chelsea", "name": "Chelsea Market", "coordinates": {"latitude": 40.7424, "longitude": -74.0061},
         "address": ["75 9th Ave", "New York, NY 10011"]},
        {"id": 3, "slug": "dumbo", "name": "DUMBO", "coordinates": {"latitude": 40.7033, "longitude": -73.9881},
         "address": ["55 Water St", "Brooklyn, NY 11201"]}
    ]"#;

    fn stores() -> Vec<Store> {
        serde_json::from_str(STORES).unwrap()
    }

    fn loaded_locator(snapshot: LocatorSnapshot) -> StoreLocator<Viewport, HeuristicLayout> {
        let mut locator = StoreLocator::new(LocatorOptions::default(), HeuristicLayout::default(), snapshot);
        locator.map_loaded(Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(480.0, 220.0)));
        locator
    }

    #[test]
    fn test_results_fit_on_load() {
        let locator = loaded_locator(LocatorSnapshot::new(stores()));
        let view = locator.surface().unwrap();

        for store in stores() {
            let px = view.lat_lng_to_pixel(&store.position());
            assert!(px.x >= 40.0 - 1e-6 && px.x <= 440.0 + 1e-6);
            assert!(px.y >= 40.0 - 1e-6 && px.y <= 180.0 + 1e-6);
        }
    }

    #[test]
    fn test_selected_popup_ends_up_inside_map() {
        let mut locator = loaded_locator(LocatorSnapshot::new(stores()));
        let soho = stores().remove(0);

        locator.select_store(soho.clone());
        let center = locator.layout_pass_completed().expect("popup should resolve");

        let view = locator.surface().unwrap();
        assert_eq!(view.center, center);

        let mut layout = HeuristicLayout::default();
        let size = layout
            .layout_offscreen(&soho.popup_content())
            .unwrap()
            .inflated(locator.options().centering.measurement_padding);
        let placement = locator.options().popup_placement();

        let overflow = remaining_overflow(
            view,
            soho.position(),
            &placement,
            size,
            ViewportSize::new(view.size.x, view.size.y),
            locator.options().centering.safety_margin,
        );
        assert!(overflow <= 1e-6, "popup still overflows by {overflow}");
        // The small map forces a real correction north of the store
        assert!(center.lat > soho.position().lat);
    }

    #[test]
    fn test_same_results_reordered_do_not_move_map() {
        let mut locator = loaded_locator(LocatorSnapshot::new(stores()));
        let before = locator.surface().unwrap().clone();

        let mut reordered = stores();
        reordered.reverse();
        assert_eq!(
            locator.update(LocatorSnapshot::new(reordered)),
            ViewportDirective::NoOp
        );
        assert_eq!(locator.surface().unwrap(), &before);

        let mut fewer = stores();
        fewer.pop();
        assert!(matches!(
            locator.update(LocatorSnapshot::new(fewer)),
            ViewportDirective::FitBounds { .. }
        ));
    }

    #[test]
    fn test_cleared_results_fall_back_to_geolocation() {
        let here = LatLng::new(40.758, -73.9855);
        let mut locator =
            loaded_locator(LocatorSnapshot::new(stores()).with_geolocation(Some(here)));

        let directive = locator.update(LocatorSnapshot::new(Vec::new()).with_geolocation(Some(here)));
        assert_eq!(directive, ViewportDirective::CenterOn(here));
        assert_eq!(locator.surface().unwrap().center, here);
    }

    #[test]
    fn test_probe_fires_once_per_key() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut probe = OffscreenProbe::new(HeuristicLayout::default())
            .on_dimensions(move |_| counter.set(counter.get() + 1));

        probe.mount(PopupContent::new("A"), "a");
        probe.complete_layout_pass();
        assert_eq!(fired.get(), 1);

        probe.update(PopupContent::new("A"), "a");
        probe.complete_layout_pass();
        assert_eq!(fired.get(), 1);

        probe.update(PopupContent::new("B"), "b");
        probe.complete_layout_pass();
        assert_eq!(fired.get(), 2);
    }
}
