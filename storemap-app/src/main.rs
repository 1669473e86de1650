use anyhow::{bail, Context};
use std::{env, fs};
use storemap::prelude::*;

const DEMO_STORES: &str = r#"[
    {"id": 1, "slug": "soho", "name": "SoHo", "coordinates": {"latitude": 40.7233, "longitude": -74.0030},
     "address": ["451 Broadway", "New York, NY 10013"], "phone": "(212) 555-0101"},
    {"id": 2, "slug": "chelsea", "name": "Chelsea Market", "coordinates": {"latitude": 40.7424, "longitude": -74.0061},
     "address": ["75 9th Ave", "New York, NY 10011"]},
    {"id": 3, "slug": "dumbo", "name": "DUMBO", "coordinates": {"latitude": 40.7033, "longitude": -73.9881},
     "address": ["55 Water St", "Brooklyn, NY 11201"]}
]"#;

struct Args {
    stores: Option<String>,
    options: Option<String>,
    select: Option<String>,
    query: Option<String>,
    size: Point,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        stores: None,
        options: None,
        select: None,
        query: None,
        size: Point::new(480.0, 320.0),
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().with_context(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--stores" => args.stores = Some(value("--stores")?),
            "--options" => args.options = Some(value("--options")?),
            "--select" => args.select = Some(value("--select")?),
            "--query" => args.query = Some(value("--query")?),
            "--size" => {
                let raw = value("--size")?;
                let (w, h) = raw
                    .split_once('x')
                    .with_context(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
                args.size = Point::new(w.trim().parse()?, h.trim().parse()?);
            }
            other => bail!(
                "unknown argument {other:?}\nusage: storemap-app [--stores FILE] [--options FILE] \
                 [--select SLUG] [--query LAT,LNG] [--size WxH]"
            ),
        }
    }
    Ok(args)
}

/// Headless walk through the locator: fit the results, open a popup, re-center
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let stores_json = match &args.stores {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => DEMO_STORES.to_string(),
    };
    let stores: Vec<Store> = serde_json::from_str(&stores_json).context("parsing stores")?;

    let options = match &args.options {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            LocatorOptions::from_json(&json)?
        }
        None => LocatorOptions::default(),
    };

    println!("Store locator");
    println!("=============");
    println!("   Style: {}", options.style_template);
    println!(
        "   Pins anchored {}, popups anchored {} offset ({}, {})",
        options.pin_anchor, options.popup_anchor, options.popup_offset.dx, options.popup_offset.dy
    );
    println!("   Map size: {}x{}", args.size.x, args.size.y);

    println!("\nResults ({}):", stores.len());
    for (index, store) in stores.iter().enumerate() {
        let label = options.marker_label(index).unwrap_or_else(|| "•".to_string());
        println!(
            "   [{}] {} ({:.4}, {:.4})",
            label, store.name, store.coordinates.latitude, store.coordinates.longitude
        );
    }

    let snapshot = LocatorSnapshot::new(stores.clone());
    let mut locator = StoreLocator::new(options, HeuristicLayout::default(), snapshot);

    if let Some(query) = args.query.as_deref() {
        // Before load this only changes where the map starts
        locator.set_query(Some(query));
    }

    locator.map_loaded(Viewport::new(LatLng::new(0.0, 0.0), 2.0, args.size));
    if let Some(view) = locator.surface() {
        println!(
            "\nMap loaded: center ({:.5}, {:.5}) zoom {}",
            view.center.lat, view.center.lng, view.zoom
        );
    }

    let selected = match &args.select {
        Some(slug) => Some(
            stores
                .iter()
                .find(|s| &s.slug == slug)
                .cloned()
                .with_context(|| format!("no store with slug {slug:?}"))?,
        ),
        None => stores.first().cloned(),
    };

    let Some(store) = selected else {
        println!("\nNo stores to select");
        return Ok(());
    };

    let directive = locator.select_store(store.clone());
    println!("\nSelected {}: {:?}", store.name, directive);

    match locator.layout_pass_completed() {
        Some(center) => println!("   Flew to ({:.5}, {:.5})", center.lat, center.lng),
        None => println!("   No popup measurement arrived"),
    }

    if let (Some(view), Some(size)) = (locator.surface(), locator.probe().measured_size()) {
        let placement = locator.options().popup_placement();
        let size = size.inflated(locator.options().centering.measurement_padding);
        let rect = placement.screen_rect(view.lat_lng_to_pixel(&store.position()), size);
        let fits = popup_fits(
            view,
            store.position(),
            &placement,
            size,
            view.size(),
            locator.options().centering.safety_margin,
        );
        println!(
            "   Popup {}x{} at ({:.1}, {:.1})-({:.1}, {:.1}), inside map: {}",
            rect.width(),
            rect.height(),
            rect.min.x,
            rect.min.y,
            rect.max.x,
            rect.max.y,
            fits
        );
    }

    let directive = locator.close_popup();
    println!("\nClosed popup: {:?}", directive);

    Ok(())
}
