// The dropper's on/off state machine.
// Visual: while on, the magnifier follows the pointer, appears over the surface
// and vanishes off it; a click keeps the color under the cursor.
// Every listener is a `Subscription` handle; turning the tool off drops them all
// together with any paint still waiting for the next frame.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::color::HexColor;
use crate::config::{DropperConfig, StyleNames};
use crate::error::Error;
use crate::events::{Confirm, Crossing, HostEvents, Neighborhood, PointerMove, SampleEvent, Subscription, Topic};
use crate::magnifier::Magnifier;
use crate::surface::{PixelSource, SamplingSurface};
use crate::types::ToolState;

/// The rendering layer's side of the overlay: where the magnifier is shown and
/// which cosmetic modifiers are switched on while the tool is live.
///
/// Callbacks run after the dropper state is released, so `mount` and `unmount`
/// may read the controller back (`committed_color`, `magnifier`).
pub trait OverlayContainer {
    /// Pointer entered the surface while active.
    fn mount(&mut self);
    /// Pointer left the surface, or the tool went inactive while mounted.
    fn unmount(&mut self);
    /// Called on every toggle with the new flag.
    fn set_tool_active(&mut self, active: bool, styles: &StyleNames);
}

type SharedContainer = Rc<RefCell<Option<Box<dyn OverlayContainer>>>>;

fn notify(container: &SharedContainer, call: impl FnOnce(&mut dyn OverlayContainer)) {
    if let Some(container) = container.borrow_mut().as_mut() {
        call(container.as_mut());
    }
}

/// Everything the listeners touch.
struct DropperState {
    magnifier: Magnifier,
    last_center: Option<HexColor>,    // most recent SampleEvent center
    committed: Option<HexColor>,      // last confirmed color
    pending_paint: Option<Neighborhood>, // coalesced until the next frame
}

impl DropperState {
    fn on_sample(&mut self, event: &SampleEvent) {
        self.last_center = Some(event.center_color.clone());
        self.magnifier.show_color(&event.center_color);
        // Later samples replace earlier ones; only the newest reaches the screen.
        self.pending_paint = Some(event.neighborhood.clone());
    }

    /// Returns whether the mount state changed.
    fn on_crossing(&mut self, crossing: Crossing) -> bool {
        match crossing {
            Crossing::Enter => self.mount(),
            Crossing::Leave => self.unmount(),
        }
    }

    fn mount(&mut self) -> bool {
        if self.magnifier.is_mounted() {
            return false;
        }
        self.magnifier.set_mounted(true);
        tracing::info!("magnifier added");
        true
    }

    fn unmount(&mut self) -> bool {
        if !self.magnifier.is_mounted() {
            return false;
        }
        self.magnifier.set_mounted(false);
        tracing::info!("magnifier removed");
        true
    }

    fn commit(&mut self) {
        match &self.last_center {
            Some(color) => {
                self.committed = Some(color.clone());
                tracing::info!(color = %color, "color committed");
            }
            None => tracing::debug!("confirm ignored: nothing sampled yet"),
        }
    }
}

pub struct MagnifierController {
    config: DropperConfig,
    tool: ToolState,
    samples: Option<Topic<SampleEvent>>,
    host: Option<HostEvents>,
    state: Rc<RefCell<DropperState>>,
    container: SharedContainer,
    subscriptions: Vec<Subscription>, // live only while active
}

impl MagnifierController {
    /// Validate the configuration and pre-build the magnifier grid.
    /// Collaborators are attached separately; the tool starts inactive.
    pub fn new(config: DropperConfig) -> Result<Self, Error> {
        config.validate()?;
        let magnifier = Magnifier::new(&config);
        Ok(Self {
            config,
            tool: ToolState::Inactive,
            samples: None,
            host: None,
            state: Rc::new(RefCell::new(DropperState {
                magnifier,
                last_center: None,
                committed: None,
                pending_paint: None,
            })),
            container: Rc::new(RefCell::new(None)),
            subscriptions: Vec::new(),
        })
    }

    /// Use `surface` as the sample source. Its grid size must match the magnifier's.
    pub fn attach_surface<S: PixelSource>(&mut self, surface: &SamplingSurface<S>) -> Result<(), Error> {
        if surface.grid_size() != self.config.grid_size {
            return Err(Error::Config(format!(
                "surface samples {0}x{0} blocks but the magnifier has a {1}x{1} grid",
                surface.grid_size(),
                self.config.grid_size
            )));
        }
        self.samples = Some(surface.samples());
        Ok(())
    }

    pub fn attach_host(&mut self, host: &HostEvents) {
        self.host = Some(host.clone());
    }

    pub fn attach_overlay(&mut self, container: Box<dyn OverlayContainer>) {
        *self.container.borrow_mut() = Some(container);
    }

    /// Flip the tool. Every side effect follows from the new flag.
    ///
    /// Activation is refused (and the tool stays inactive) when a collaborator is missing.
    pub fn toggle(&mut self) -> Result<ToolState, Error> {
        match self.tool.flipped() {
            ToolState::Active => {
                if let Err(err) = self.activate() {
                    tracing::warn!(error = %err, "color dropper not activated");
                    return Err(err);
                }
                self.tool = ToolState::Active;
                tracing::info!("ColorDropper events added");
            }
            ToolState::Inactive => {
                self.deactivate();
                self.tool = ToolState::Inactive;
                tracing::info!("ColorDropper events removed");
            }
        }
        Ok(self.tool)
    }

    fn activate(&mut self) -> Result<(), Error> {
        let samples = self.samples.clone().ok_or(Error::MissingCollaborator("surface"))?;
        let host = self.host.clone().ok_or(Error::MissingCollaborator("host events"))?;
        if self.container.borrow().is_none() {
            return Err(Error::MissingCollaborator("overlay container"));
        }

        let state = Rc::clone(&self.state);
        self.subscriptions.push(host.pointer_moves.subscribe(move |p: &PointerMove| {
            state.borrow_mut().magnifier.follow(p.x, p.y);
        }));

        let state = Rc::clone(&self.state);
        self.subscriptions.push(samples.subscribe(move |e: &SampleEvent| {
            state.borrow_mut().on_sample(e);
        }));

        let state = Rc::clone(&self.state);
        let container = Rc::clone(&self.container);
        self.subscriptions.push(host.crossings.subscribe(move |c: &Crossing| {
            let changed = state.borrow_mut().on_crossing(*c);
            match (changed, c) {
                (true, Crossing::Enter) => notify(&container, |o| o.mount()),
                (true, Crossing::Leave) => notify(&container, |o| o.unmount()),
                (false, _) => {}
            }
        }));

        let state = Rc::clone(&self.state);
        self.subscriptions.push(host.confirms.subscribe(move |_: &Confirm| {
            state.borrow_mut().commit();
        }));

        notify(&self.container, |o| o.set_tool_active(true, &self.config.styles));
        Ok(())
    }

    fn deactivate(&mut self) {
        // Dropping the handles unsubscribes; nothing below can be reached by a listener again.
        self.subscriptions.clear();

        let was_mounted = {
            let mut state = self.state.borrow_mut();
            state.pending_paint = None;
            state.last_center = None;
            state.magnifier.clear_readout();
            state.unmount()
        };
        if was_mounted {
            notify(&self.container, |o| o.unmount());
        }
        notify(&self.container, |o| o.set_tool_active(false, &self.config.styles));
    }

    /// Frame boundary: apply the newest pending neighborhood, if any.
    /// Returns whether a paint happened.
    pub fn frame(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        match state.pending_paint.take() {
            Some(neighborhood) => {
                state.magnifier.paint(&neighborhood);
                true
            }
            None => false,
        }
    }

    /// Copy the last delivered center color into the committed slot.
    /// No-op while inactive or before anything was sampled.
    pub fn commit(&mut self) {
        if self.tool.is_active() {
            self.state.borrow_mut().commit();
        }
    }

    pub fn tool_state(&self) -> ToolState {
        self.tool
    }

    pub fn is_active(&self) -> bool {
        self.tool.is_active()
    }

    pub fn committed_color(&self) -> Option<HexColor> {
        self.state.borrow().committed.clone()
    }

    /// Center color of the most recent sample since activation.
    pub fn last_sampled(&self) -> Option<HexColor> {
        self.state.borrow().last_center.clone()
    }

    pub fn has_pending_paint(&self) -> bool {
        self.state.borrow().pending_paint.is_some()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn magnifier(&self) -> Ref<'_, Magnifier> {
        Ref::map(self.state.borrow(), |s| &s.magnifier)
    }

    pub fn config(&self) -> &DropperConfig {
        &self.config
    }
}
