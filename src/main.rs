// What you SEE:
// • The image stretched across the window, under a thin toolbar.
// • D (or the toolbar button) toggles the dropper. While it is on, a magnifier
//   follows the cursor over the image showing the pixels around it, the center
//   one outlined, framed in its color with the hex code underneath.
// • Left click on the image drops that color into the PICKED slot. ESC quits.

use clap::Parser;
use color_dropper::cli::CliArgs;
use color_dropper::draw::{
    draw_crosshair, draw_magnifier, draw_surface, draw_toolbar, Chrome, Drawer, TOOLBAR_HEIGHT,
};
use color_dropper::gamma::GammaLut;
use color_dropper::types::FrameBuffer;
use color_dropper::{
    logging, Confirm, Crossing, Error, HostEvents, MagnifierController, PointerMove, Rect, SamplingSurface,
    ToolState,
};

fn main() -> Result<(), Error> {
    let args = CliArgs::parse();
    logging::init(args.debug);
    let config = args.dropper_config()?;

    /* --- Surface + window setup ---
       Visual: window opens showing the image below the toolbar. */
    let bounds = Rect::new(0.0, TOOLBAR_HEIGHT as f32, args.width as f32, args.height as f32);
    let surface = SamplingSurface::load(&args.image, bounds, config.grid_size)?;
    let (w, h) = (args.width as usize, args.height as usize + TOOLBAR_HEIGHT);
    let mut drawer = Drawer::new("Color Dropper", w, h)?;
    let mut screen = FrameBuffer::new(w, h);
    let lut = GammaLut::new();
    let button = Rect::new(6.0, 4.0, 100.0, 20.0);

    /* --- Dropper wiring ---
       The window is the host: it forwards pointer, boundary and click
       notifications; the chrome flags tell it what to draw. */
    let host = HostEvents::new();
    let chrome = Chrome::default();
    let mut dropper = MagnifierController::new(config)?;
    dropper.attach_surface(&surface)?;
    dropper.attach_host(&host);
    dropper.attach_overlay(Box::new(chrome.clone()));

    let mut last_pos: Option<(f32, f32)> = None;
    let mut over_surface = false;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let pos = drawer.mouse_pos();
        let clicked = drawer.left_clicked();
        let on_button = pos.is_some_and(|(x, y)| button.contains(x, y));

        /* 1) Toggle. Listeners attach now, so re-announce where the pointer already is. */
        if drawer.d_pressed_once() || (clicked && on_button) {
            match dropper.toggle() {
                Ok(ToolState::Active) => {
                    if let Some((x, y)) = pos {
                        host.pointer_moves.publish(&PointerMove { x, y });
                        if over_surface {
                            host.crossings.publish(&Crossing::Enter);
                            surface.pointer_moved(x, y);
                        }
                    }
                }
                Ok(_) => {}
                Err(err) => tracing::error!(error = %err, "toggle failed"),
            }
            drawer.set_cursor_visible(!chrome.flags().tool_active);
        }

        /* 2) Pointer: document move first, then boundary, then the surface sample. */
        if pos != last_pos {
            if let Some((x, y)) = pos {
                host.pointer_moves.publish(&PointerMove { x, y });
            }
            let inside = pos.is_some_and(|(x, y)| surface.bounds().contains(x, y));
            if inside != over_surface {
                host.crossings.publish(if inside { &Crossing::Enter } else { &Crossing::Leave });
                over_surface = inside;
            }
            if let (true, Some((x, y))) = (inside, pos) {
                surface.pointer_moved(x, y);
            }
            last_pos = pos;
        }

        /* 3) Confirm: a click on the image. */
        if clicked && over_surface {
            host.confirms.publish(&Confirm);
        }

        /* 4) Frame boundary: at most one magnifier paint, newest sample wins. */
        dropper.frame();

        /* 5) Compose and present. */
        let flags = chrome.flags();
        draw_surface(&mut screen, surface.source(), surface.bounds(), &lut);
        draw_toolbar(&mut screen, button, flags, dropper.committed_color().as_ref(), &lut);
        if flags.magnifier_shown {
            draw_magnifier(&mut screen, &dropper.magnifier(), &lut);
        } else if let (true, Some((x, y))) = (flags.tool_active, pos) {
            draw_crosshair(&mut screen, x as i32, y as i32, 8, 0x00_FF_CC_33);
        }
        drawer.present(&screen)?;
    }

    if let Some(color) = dropper.committed_color() {
        println!("{color}");
    }
    Ok(())
}
