// SPDX-License-Identifier: GPL-3.0-only

//! Recording fakes and a harness for handler tests

use crate::app::scheduler::ManualScheduler;
use crate::app::state::Message;
use crate::app::{Viewfinder, ViewfinderDelegate};
use crate::backends::{
    CaptureBackend, CaptureSession, Completion, ConnectionInfo, NormalizedFocusPoint,
    PreviewSurfaceRef, Rect, SessionEvent, SessionEventSink, SessionHandle, Size,
};
use crate::config::Config;
use crate::flash::FlashMode;
use crate::location::{Location, LocationProvider, StaticLocationProvider};
use crate::orientation::{CaptureOrientation, DeviceOrientation};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub(crate) struct RecordingSession {
    orientation_supported: AtomicBool,
    applied: Mutex<Vec<CaptureOrientation>>,
}

impl CaptureSession for RecordingSession {
    fn connection(&self) -> Option<ConnectionInfo> {
        Some(ConnectionInfo {
            orientation_supported: self.orientation_supported.load(Ordering::SeqCst),
            mirrored: false,
        })
    }

    fn set_video_orientation(&self, orientation: CaptureOrientation) {
        self.applied.lock().unwrap().push(orientation);
    }

    fn frame_size(&self) -> Option<Size> {
        Some(Size::new(1920.0, 1080.0))
    }
}

type RecordedCapture = (PreviewSurfaceRef, Option<Location>, Completion);

#[derive(Default)]
struct Recorded {
    setups: Vec<bool>,
    focus: Vec<NormalizedFocusPoint>,
    flash: Vec<FlashMode>,
    switch_requests: usize,
    switches: Vec<Completion>,
    captures: Vec<RecordedCapture>,
    surfaces: Vec<PreviewSurfaceRef>,
    locations: Vec<Option<Location>>,
}

/// Backend that records commands and completes only when told to
pub(crate) struct RecordingBackend {
    recorded: Mutex<Recorded>,
    session: Arc<RecordingSession>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self {
            recorded: Mutex::new(Recorded::default()),
            session: Arc::new(RecordingSession {
                orientation_supported: AtomicBool::new(true),
                applied: Mutex::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn set_orientation_supported(&self, supported: bool) {
        self.session
            .orientation_supported
            .store(supported, Ordering::SeqCst);
    }

    pub(crate) fn applied_orientations(&self) -> Vec<CaptureOrientation> {
        self.session.applied.lock().unwrap().clone()
    }

    pub(crate) fn setups(&self) -> Vec<bool> {
        self.recorded.lock().unwrap().setups.clone()
    }

    pub(crate) fn focus_points(&self) -> Vec<NormalizedFocusPoint> {
        self.recorded.lock().unwrap().focus.clone()
    }

    pub(crate) fn flash_modes(&self) -> Vec<FlashMode> {
        self.recorded.lock().unwrap().flash.clone()
    }

    pub(crate) fn switch_requests(&self) -> usize {
        self.recorded.lock().unwrap().switch_requests
    }

    pub(crate) fn pending_switches(&self) -> usize {
        self.recorded.lock().unwrap().switches.len()
    }

    pub(crate) fn complete_switch(&self) {
        let switches = std::mem::take(&mut self.recorded.lock().unwrap().switches);
        switches.into_iter().for_each(Completion::complete);
    }

    /// Give up on pending switches without signalling
    pub(crate) fn drop_switches(&self) {
        let switches = std::mem::take(&mut self.recorded.lock().unwrap().switches);
        drop(switches);
    }

    pub(crate) fn pending_captures(&self) -> usize {
        self.recorded.lock().unwrap().captures.len()
    }

    pub(crate) fn capture_surfaces(&self) -> Vec<PreviewSurfaceRef> {
        self.recorded.lock().unwrap().surfaces.clone()
    }

    pub(crate) fn capture_locations(&self) -> Vec<Option<Location>> {
        self.recorded.lock().unwrap().locations.clone()
    }

    pub(crate) fn complete_captures(&self) {
        let captures = std::mem::take(&mut self.recorded.lock().unwrap().captures);
        for (_, _, done) in captures {
            done.complete();
        }
    }
}

impl CaptureBackend for RecordingBackend {
    fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    fn setup(&self, start_on_front_camera: bool, _events: SessionEventSink) {
        self.recorded
            .lock()
            .unwrap()
            .setups
            .push(start_on_front_camera);
    }

    fn switch_camera(&self, done: Completion) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.switch_requests += 1;
        recorded.switches.push(done);
    }

    fn set_flash_mode(&self, mode: FlashMode) {
        self.recorded.lock().unwrap().flash.push(mode);
    }

    fn focus(&self, point: NormalizedFocusPoint) {
        self.recorded.lock().unwrap().focus.push(point);
    }

    fn capture_photo(&self, surface: PreviewSurfaceRef, location: Option<Location>, done: Completion) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.surfaces.push(surface);
        recorded.locations.push(location);
        recorded.captures.push((surface, location, done));
    }
}

#[derive(Default)]
pub(crate) struct RecordingDelegate {
    flash_hidden: Mutex<Vec<bool>>,
    images: AtomicUsize,
    unavailable: AtomicUsize,
}

impl RecordingDelegate {
    pub(crate) fn flash_hidden(&self) -> Vec<bool> {
        self.flash_hidden.lock().unwrap().clone()
    }

    pub(crate) fn images(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }

    pub(crate) fn unavailable(&self) -> usize {
        self.unavailable.load(Ordering::SeqCst)
    }
}

impl ViewfinderDelegate for RecordingDelegate {
    fn set_flash_button_hidden(&self, hidden: bool) {
        self.flash_hidden.lock().unwrap().push(hidden);
    }

    fn image_captured(&self) {
        self.images.fetch_add(1, Ordering::SeqCst);
    }

    fn camera_not_available(&self) {
        self.unavailable.fetch_add(1, Ordering::SeqCst);
    }
}

/// Viewfinder wired to recording fakes and a manual clock
pub(crate) struct Harness {
    pub(crate) viewfinder: Viewfinder,
    pub(crate) backend: Arc<RecordingBackend>,
    pub(crate) delegate: Arc<RecordingDelegate>,
    pub(crate) scheduler: ManualScheduler,
    pub(crate) location: Arc<StaticLocationProvider>,
    receiver: UnboundedReceiver<Message>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub(crate) fn with_location(record_location: bool) -> Self {
        Self::with_config(Config {
            record_location,
            ..Config::default()
        })
    }

    pub(crate) fn with_config(config: Config) -> Self {
        let (sender, receiver) = crate::app::channel();
        let backend = Arc::new(RecordingBackend::new());
        let scheduler = ManualScheduler::new(sender.clone());
        let location = Arc::new(StaticLocationProvider::new(Location::now(60.17, 24.94)));
        let delegate = Arc::new(RecordingDelegate::default());

        let mut viewfinder = Viewfinder::new(
            config,
            backend.clone(),
            Box::new(scheduler.clone()),
            sender,
            Some(location.clone() as Arc<dyn LocationProvider>),
        );
        viewfinder.set_delegate(&delegate);

        Self {
            viewfinder,
            backend,
            delegate,
            scheduler,
            location,
            receiver,
        }
    }

    /// Started session with an 800x600 portrait layout
    pub(crate) fn started() -> Self {
        let mut h = Self::new();
        h.viewfinder.start();
        h.viewfinder
            .layout(Rect::new(0.0, 0.0, 800.0, 600.0), DeviceOrientation::Portrait);
        h.session_event(SessionEvent::SessionStarted);
        h
    }

    /// Process every queued message
    pub(crate) fn pump(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.viewfinder.update(message);
        }
    }

    pub(crate) fn advance(&mut self, by: Duration) {
        self.scheduler.advance(by);
        self.pump();
    }

    pub(crate) fn send(&mut self, message: Message) {
        self.viewfinder.update(message);
        self.pump();
    }

    pub(crate) fn session_event(&mut self, event: SessionEvent) {
        self.send(Message::Session(event));
    }
}
