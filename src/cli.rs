// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Running a scripted viewfinder session against the simulated camera
//! - Showing the effective configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use viewfinder::app::{self, TokioScheduler};
use viewfinder::backends::{Point, Rect};
use viewfinder::constants::{COVER_FADE_IN, COVER_FADE_OUT, FOCUS_INDICATOR_LIFETIME};
use viewfinder::errors::{AppError, AppResult};
use viewfinder::location::{Location, LocationProvider, StaticLocationProvider};
use viewfinder::{
    Config, DeviceOrientation, SimulatedBackend, SimulatedOptions, Viewfinder,
    ViewfinderDelegate, ViewfinderHandle,
};

/// Arguments of the `simulate` command
pub struct SimulateArgs {
    pub config: Option<PathBuf>,
    pub front: bool,
    pub orientation: String,
    pub photos: usize,
    pub flash: Option<String>,
    pub location: Option<(f64, f64)>,
    pub unavailable: bool,
}

/// Prints host notifications as they arrive
struct PrintingDelegate;

impl ViewfinderDelegate for PrintingDelegate {
    fn set_flash_button_hidden(&self, hidden: bool) {
        println!("  flash button {}", if hidden { "hidden" } else { "shown" });
    }

    fn image_captured(&self) {
        println!("  image captured");
    }

    fn camera_not_available(&self) {
        println!("  camera not available");
    }
}

fn load_config(path: Option<PathBuf>) -> AppResult<Config> {
    let config = match path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Preview bounds of a phone-sized view in the given orientation
fn view_bounds(orientation: DeviceOrientation) -> Rect {
    match orientation.capture_orientation() {
        Some(o) if !o.is_portrait() => Rect::new(0.0, 0.0, 844.0, 390.0),
        _ => Rect::new(0.0, 0.0, 390.0, 844.0),
    }
}

/// Run a scripted session: start, focus, optionally set flash, take photos,
/// switch lens, shut down
pub fn simulate(args: SimulateArgs) -> AppResult<()> {
    let orientation = DeviceOrientation::from_name(&args.orientation).ok_or_else(|| {
        AppError::InvalidArgument(format!("unknown orientation {:?}", args.orientation))
    })?;

    let mut config = load_config(args.config)?;
    if args.front {
        config.start_on_front_camera = true;
    }
    if args.location.is_some() {
        config.record_location = true;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let options = SimulatedOptions {
            unavailable: args.unavailable,
            ..SimulatedOptions::default()
        };
        let start_wait = options.start_latency + Duration::from_millis(50);
        let switch_wait =
            COVER_FADE_IN + options.switch_latency + COVER_FADE_OUT + Duration::from_millis(50);
        let backend = Arc::new(SimulatedBackend::new(options, Handle::current()));

        let location = args.location.map(|(lat, lon)| {
            Arc::new(StaticLocationProvider::new(Location::now(lat, lon))) as Arc<dyn LocationProvider>
        });

        let (sender, receiver) = app::channel();
        let scheduler = TokioScheduler::new(sender.clone(), Handle::current());
        let mut viewfinder = Viewfinder::new(
            config,
            backend.clone(),
            Box::new(scheduler),
            sender.clone(),
            location,
        );
        let delegate = Arc::new(PrintingDelegate);
        viewfinder.set_delegate(&delegate);

        let handle = ViewfinderHandle::new(sender);
        let running = tokio::spawn(app::run(viewfinder, receiver));

        println!("Starting simulated camera ({})", orientation);
        let bounds = view_bounds(orientation);
        handle.appeared();
        handle.layout(bounds, orientation);
        tokio::time::sleep(start_wait).await;

        handle.tap(bounds.center());
        println!("Focus requested at {}", bounds.center());
        if let Some(label) = &args.flash {
            handle.select_flash(label.clone());
        }

        for index in 1..=args.photos {
            let (done_tx, done_rx) = oneshot::channel();
            handle.take_picture(move || {
                let _ = done_tx.send(());
            });
            // The callback is dropped unrun when the capture is ignored
            match done_rx.await {
                Ok(()) => println!("Photo {} stored", index),
                Err(_) => println!("Photo {} skipped", index),
            }
        }

        println!("Switching camera");
        handle.switch_camera();
        tokio::time::sleep(switch_wait).await;

        handle.tap(Point::new(bounds.width() * 0.25, bounds.height() * 0.25));
        tokio::time::sleep(FOCUS_INDICATOR_LIFETIME).await;

        handle.disappeared();
        handle.shutdown();
        let viewfinder = running.await?;

        println!();
        println!("Session summary:");
        println!("  lens:     {:?}", backend.lens());
        println!("  flash:    {}", viewfinder.flash_mode().label());
        println!("  has camera: {}", viewfinder.visibility().has_camera);
        for (index, photo) in backend.photos().iter().enumerate() {
            let location = photo
                .location
                .map(|l| format!("{:.4}, {:.4}", l.latitude, l.longitude))
                .unwrap_or_else(|| "untagged".to_string());
            println!(
                "  photo {}: {:?} lens, flash {}, {} ({})",
                index + 1,
                photo.lens,
                photo.flash,
                photo.surface.bounds,
                location
            );
        }
        Ok::<(), AppError>(())
    })
}

/// Print the configuration file path or its effective contents
pub fn show_config(path: Option<PathBuf>, path_only: bool) -> AppResult<()> {
    if path_only {
        let path = match path {
            Some(path) => path,
            None => Config::default_path()?,
        };
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(path)?;
    println!("{}", config.to_json()?);
    Ok(())
}
