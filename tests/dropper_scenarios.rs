use std::cell::RefCell;
use std::rc::Rc;

use color_dropper::color::parse_hex;
use color_dropper::config::StyleNames;
use color_dropper::{
    center_index, Confirm, Crossing, DropperConfig, HostEvents, MagnifierController,
    OverlayContainer, PixelSample, PixelSource, PointerMove, Rect, SampleEvent, SamplingSurface, ToolState,
};

/// Plain in-memory surface buffer.
struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<PixelSample>,
}

impl Bitmap {
    fn filled(width: u32, height: u32, p: PixelSample) -> Self {
        Self { width, height, pixels: vec![p; (width * height) as usize] }
    }

    fn set(&mut self, x: u32, y: u32, p: PixelSample) {
        self.pixels[(y * self.width + x) as usize] = p;
    }
}

impl PixelSource for Bitmap {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> PixelSample {
        self.pixels[(y * self.width + x) as usize]
    }
}

#[derive(Default)]
struct Log {
    mounted: bool,
    toggles: Vec<bool>,
}

struct RecordingOverlay(Rc<RefCell<Log>>);

impl OverlayContainer for RecordingOverlay {
    fn mount(&mut self) {
        self.0.borrow_mut().mounted = true;
    }
    fn unmount(&mut self) {
        self.0.borrow_mut().mounted = false;
    }
    fn set_tool_active(&mut self, active: bool, _styles: &StyleNames) {
        self.0.borrow_mut().toggles.push(active);
    }
}

const RED: PixelSample = PixelSample::opaque(255, 0, 0);

struct Setup {
    surface: SamplingSurface<Bitmap>,
    host: HostEvents,
    dropper: MagnifierController,
    log: Rc<RefCell<Log>>,
}

fn setup(bitmap: Bitmap, grid_size: u32) -> Setup {
    let bounds = Rect::new(0.0, 0.0, bitmap.width as f32, bitmap.height as f32);
    let surface = SamplingSurface::new(bitmap, bounds, grid_size);
    let host = HostEvents::new();
    let log = Rc::new(RefCell::new(Log::default()));

    let mut dropper = MagnifierController::new(DropperConfig { grid_size, ..DropperConfig::default() }).unwrap();
    dropper.attach_surface(&surface).unwrap();
    dropper.attach_host(&host);
    dropper.attach_overlay(Box::new(RecordingOverlay(Rc::clone(&log))));
    Setup { surface, host, dropper, log }
}

/// What a host does for one pointer move over the surface.
fn hover(s: &Setup, x: f32, y: f32) {
    s.host.pointer_moves.publish(&PointerMove { x, y });
    s.surface.pointer_moved(x, y);
}

#[test]
fn red_square_hovered_at_center() {
    let surface = SamplingSurface::new(Bitmap::filled(2, 2, RED), Rect::new(0.0, 0.0, 2.0, 2.0), 2);
    let seen: Rc<RefCell<Vec<SampleEvent>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let _sub = surface.samples().subscribe(move |e: &SampleEvent| sink.borrow_mut().push(e.clone()));

    surface.pointer_moved(1.0, 1.0);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    let colors: Vec<&str> = seen[0].neighborhood.iter().map(|h| h.as_str()).collect();
    assert_eq!(colors, ["#ff0000", "#ff0000", "#ff0000", "#ff0000"]);
    assert_eq!(seen[0].center_color.as_str(), "#ff0000");
    assert_eq!(seen[0].neighborhood[center_index(2)], seen[0].center_color);
}

#[test]
fn translucent_pixel_keeps_alpha_digits() {
    let surface = SamplingSurface::new(
        Bitmap::filled(1, 1, PixelSample::new(10, 20, 30, 128)),
        Rect::new(0.0, 0.0, 1.0, 1.0),
        1,
    );
    assert_eq!(surface.sample_center(0, 0).as_str(), "#0a141e80");
    assert_eq!(parse_hex("#0a141e80"), Some(PixelSample::new(10, 20, 30, 128)));
}

#[test]
fn magnifier_center_follows_the_hovered_pixel() {
    let mut bitmap = Bitmap::filled(9, 9, PixelSample::opaque(0, 0, 255));
    bitmap.set(4, 4, RED);
    let mut s = setup(bitmap, 3);

    s.dropper.toggle().unwrap();
    s.host.crossings.publish(&Crossing::Enter);
    hover(&s, 4.5, 4.5);
    assert!(s.dropper.frame());

    let m = s.dropper.magnifier();
    assert_eq!(m.label(), "#ff0000");
    let center = &m.cells()[m.center_index()];
    assert!(center.selected);
    assert_eq!(center.fill.as_ref().map(|h| h.as_str()), Some("#ff0000"));
    assert_eq!(m.cells()[0].fill.as_ref().map(|h| h.as_str()), Some("#0000ff"));
    assert_eq!(m.position(), Some((4.5, 4.5)));
    assert!(s.log.borrow().mounted);
}

#[test]
fn hovering_the_corner_samples_transparent_outside() {
    let mut s = setup(Bitmap::filled(4, 4, RED), 3);
    s.dropper.toggle().unwrap();
    hover(&s, 0.2, 0.2);
    s.dropper.frame();

    let m = s.dropper.magnifier();
    assert_eq!(m.cells()[0].fill.as_ref().map(|h| h.as_str()), Some("#00000000"));
    assert_eq!(m.cells()[4].fill.as_ref().map(|h| h.as_str()), Some("#ff0000"));
}

#[test]
fn toggling_twice_leaves_no_listeners() {
    let mut s = setup(Bitmap::filled(4, 4, RED), 3);
    assert_eq!(s.dropper.toggle().unwrap(), ToolState::Active);
    assert_eq!(s.dropper.toggle().unwrap(), ToolState::Inactive);

    hover(&s, 1.0, 1.0);
    s.host.crossings.publish(&Crossing::Enter);
    s.host.confirms.publish(&Confirm);

    assert!(!s.dropper.frame());
    assert_eq!(s.dropper.magnifier().paint_count(), 0);
    assert_eq!(s.dropper.magnifier().position(), None);
    assert!(!s.dropper.magnifier().is_mounted());
    assert_eq!(s.dropper.subscription_count(), 0);
    assert_eq!(s.host.subscriber_count(), 0);
    assert_eq!(s.surface.samples().subscriber_count(), 0);
    assert_eq!(s.log.borrow().toggles, vec![true, false]);
}

#[test]
fn confirm_before_any_hover_is_a_noop() {
    let mut s = setup(Bitmap::filled(4, 4, RED), 3);
    s.dropper.toggle().unwrap();
    s.host.confirms.publish(&Confirm);
    s.dropper.commit();
    assert_eq!(s.dropper.committed_color(), None);
}

#[test]
fn committed_color_survives_reactivation() {
    let mut bitmap = Bitmap::filled(4, 4, PixelSample::opaque(0, 128, 0));
    bitmap.set(2, 2, RED);
    let mut s = setup(bitmap, 3);

    s.dropper.toggle().unwrap();
    s.host.crossings.publish(&Crossing::Enter);
    hover(&s, 2.0, 2.0);
    s.host.confirms.publish(&Confirm);
    assert_eq!(s.dropper.committed_color().map(|h| h.to_string()), Some("#ff0000".to_string()));

    s.dropper.toggle().unwrap();
    s.dropper.toggle().unwrap();
    s.host.confirms.publish(&Confirm);
    assert_eq!(s.dropper.committed_color().map(|h| h.to_string()), Some("#ff0000".to_string()));
}

#[test]
fn confirm_takes_the_latest_delivered_sample() {
    let mut bitmap = Bitmap::filled(4, 4, PixelSample::opaque(0, 128, 0));
    bitmap.set(3, 3, RED);
    let mut s = setup(bitmap, 3);

    s.dropper.toggle().unwrap();
    hover(&s, 0.0, 0.0);
    hover(&s, 3.0, 3.0);
    s.host.confirms.publish(&Confirm);
    hover(&s, 1.0, 1.0);

    assert_eq!(s.dropper.committed_color().map(|h| h.to_string()), Some("#ff0000".to_string()));
    assert_eq!(s.dropper.last_sampled().map(|h| h.to_string()), Some("#008000".to_string()));
}

#[test]
fn rapid_samples_paint_once_with_the_newest() {
    let mut bitmap = Bitmap::filled(8, 8, PixelSample::opaque(0, 0, 0));
    bitmap.set(6, 6, RED);
    let mut s = setup(bitmap, 1);

    s.dropper.toggle().unwrap();
    for x in 0..6 {
        hover(&s, x as f32, 6.0);
    }
    hover(&s, 6.0, 6.0);
    assert!(s.dropper.frame());
    assert!(!s.dropper.frame());

    let m = s.dropper.magnifier();
    assert_eq!(m.paint_count(), 1);
    assert_eq!(m.cells()[0].fill.as_ref().map(|h| h.as_str()), Some("#ff0000"));
}

#[test]
fn independent_dropper_instances_do_not_share_state() {
    let mut a = setup(Bitmap::filled(3, 3, RED), 1);
    let mut b = setup(Bitmap::filled(3, 3, PixelSample::opaque(0, 0, 255)), 1);

    a.dropper.toggle().unwrap();
    b.dropper.toggle().unwrap();
    hover(&a, 1.0, 1.0);
    a.host.confirms.publish(&Confirm);

    assert_eq!(a.dropper.committed_color().map(|h| h.to_string()), Some("#ff0000".to_string()));
    assert_eq!(b.dropper.committed_color(), None);
    assert_eq!(b.dropper.last_sampled(), None);
}
