//! Session wiring: DOM glue, the frame loop, toggle handling and
//! teardown.
//!
//! All mutable state lives in one `Session` owned behind an
//! `Rc<RefCell<..>>` shared by the event closures, so nothing is
//! module-global and independent mounts would not cross-contaminate.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Document, HtmlCanvasElement, HtmlElement, ResizeObserver};

use super::render::{BloomSettings, SceneRenderer};
use crate::morph::{Mode, MorphDriver};
use crate::rng::Mulberry32;
use crate::sampler::{
    sample, sample_starfield, twinkle_seeds, ParticleSet, ShapeKind, PARTICLE_COUNT, SHAPE_SEED,
    STAR_COUNT, STAR_SEED,
};

/// Container the canvas is mounted into.
pub const MOUNT_ID: &str = "festive-root";
/// Control whose clicks flip the silhouette.
pub const TOGGLE_ID: &str = "festive-toggle";

/// Label for the toggle while `current` is on screen: it names the
/// mode a click switches to.
pub fn toggle_label(current: Mode) -> &'static str {
    match current {
        Mode::Tree => "Switch to birthday cake",
        Mode::Cake => "Switch to Christmas tree",
    }
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct Session {
    renderer: SceneRenderer,
    driver: MorphDriver,
    tree: ParticleSet,
    cake: ParticleSet,
    live_pos: Vec<f32>,
    live_col: Vec<f32>,
    mount: HtmlElement,
    toggle: Option<HtmlElement>,
    observer: Option<ResizeObserver>,
    start_ms: f64,
    raf_handle: Option<i32>,
    raf_closure: SharedClosure,
    toggle_closure: Option<Closure<dyn FnMut()>>,
    resize_closure: Option<Closure<dyn FnMut()>>,
    unload_closure: Option<Closure<dyn FnMut()>>,
    torn_down: bool,
}

impl Session {
    fn frame(&mut self, now_ms: f64) {
        let t = ((now_ms - self.start_ms) / 1000.0) as f32;

        if self.driver.in_progress() {
            let target = match self.driver.mode() {
                Mode::Tree => &self.tree,
                Mode::Cake => &self.cake,
            };
            if self.driver.tick(target, &mut self.live_pos, &mut self.live_col) {
                self.renderer.upload_live(&self.live_pos, &self.live_col);
            }
        }

        self.renderer.render(t);
    }

    fn toggle(&mut self) {
        let next = self.driver.mode().other();
        if self.driver.begin(next, &self.live_pos, &self.live_col) {
            self.renderer.set_bloom(BloomSettings::for_mode(next));
            if let Some(button) = &self.toggle {
                button.set_text_content(Some(toggle_label(next)));
            }
        }
    }

    fn resize(&mut self) -> Result<(), JsValue> {
        let rect = self.mount.get_bounding_client_rect();
        let pixel_ratio = window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .min(2.0);
        self.renderer.resize(rect.width(), rect.height(), pixel_ratio)
    }

    /// Ordered release of everything the session acquired. Safe to
    /// call again; later calls do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Some(handle) = self.raf_handle.take() {
            if let Some(w) = window() {
                w.cancel_animation_frame(handle).ok();
            }
        }
        self.raf_closure.borrow_mut().take();

        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.resize_closure.take();

        if let (Some(button), Some(cb)) = (&self.toggle, &self.toggle_closure) {
            button
                .remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
                .ok();
        }
        self.toggle_closure.take();

        // The unload closure may be the caller; leak it instead of
        // dropping a function that is still on the stack.
        if let Some(cb) = self.unload_closure.take() {
            if let Some(w) = window() {
                w.remove_event_listener_with_callback("beforeunload", cb.as_ref().unchecked_ref())
                    .ok();
            }
            cb.forget();
        }

        self.renderer.dispose();
        if let Some(parent) = self.renderer.canvas().parent_node() {
            parent.remove_child(self.renderer.canvas()).ok();
        }

        log::info!("scene torn down");
    }
}

/// Build the scene inside `mount` and start the frame loop.
pub fn start(document: &Document, mount: &HtmlElement) -> Result<Rc<RefCell<Session>>, JsValue> {
    // Clear old content
    mount.set_inner_html("");

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    mount.append_child(&canvas)?;

    // One generator for the morph targets and twinkle seeds, a second
    // for the stars so neither perturbs the other's stream.
    let mut shape_rng = Mulberry32::new(SHAPE_SEED);
    let tree = sample(ShapeKind::Tree, PARTICLE_COUNT, &mut shape_rng);
    let cake = sample(ShapeKind::Cake, PARTICLE_COUNT, &mut shape_rng);
    let seeds = twinkle_seeds(PARTICLE_COUNT, &mut shape_rng);

    let mut star_rng = Mulberry32::new(STAR_SEED);
    let starfield = sample_starfield(STAR_COUNT, &mut star_rng);

    let live_pos = tree.positions.clone();
    let live_col = tree.colors.clone();

    let mut renderer = SceneRenderer::new(&canvas, &tree, &starfield, &seeds)?;
    renderer.set_bloom(BloomSettings::for_mode(Mode::Tree));

    let toggle = document
        .get_element_by_id(TOGGLE_ID)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());
    if let Some(button) = &toggle {
        button.set_text_content(Some(toggle_label(Mode::Tree)));
    }

    let start_ms = window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);

    let session = Rc::new(RefCell::new(Session {
        renderer,
        driver: MorphDriver::new(Mode::Tree, PARTICLE_COUNT * 3),
        tree,
        cake,
        live_pos,
        live_col,
        mount: mount.clone(),
        toggle,
        observer: None,
        start_ms,
        raf_handle: None,
        raf_closure: Rc::new(RefCell::new(None)),
        toggle_closure: None,
        resize_closure: None,
        unload_closure: None,
        torn_down: false,
    }));

    // If any of the wiring below fails, release what was already
    // acquired before reporting the failure upward.
    if let Err(e) = wire(&session, mount) {
        session.borrow_mut().teardown();
        return Err(e);
    }

    log::info!(
        "scene initialized: {} particles, {} stars",
        PARTICLE_COUNT,
        STAR_COUNT
    );

    Ok(session)
}

/// Hook the session up to its environment: initial resize, resize
/// observation, toggle clicks, unload teardown and the frame loop.
fn wire(session: &Rc<RefCell<Session>>, mount: &HtmlElement) -> Result<(), JsValue> {
    session.borrow_mut().resize()?;

    // Viewport resize recomputes projection and output dimensions.
    {
        let session = session.clone();
        let closure = Closure::wrap(Box::new(move || {
            if let Err(e) = session.borrow_mut().resize() {
                log::warn!("resize failed: {e:?}");
            }
        }) as Box<dyn FnMut()>);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(mount);
        let mut s = session.borrow_mut();
        s.observer = Some(observer);
        s.resize_closure = Some(closure);
    }

    if session.borrow().toggle.is_some() {
        let closure = {
            let session = session.clone();
            Closure::wrap(Box::new(move || {
                session.borrow_mut().toggle();
            }) as Box<dyn FnMut()>)
        };
        let mut s = session.borrow_mut();
        if let Some(button) = &s.toggle {
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        }
        s.toggle_closure = Some(closure);
    }

    // In case the page is hot-reloaded or navigated away.
    {
        let session = session.clone();
        let closure = Closure::wrap(Box::new(move || {
            session.borrow_mut().teardown();
        }) as Box<dyn FnMut()>);
        window()
            .ok_or("no window")?
            .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())?;
        session.borrow_mut().unload_closure = Some(closure);
    }

    // Animation loop. The closure re-schedules itself through the
    // shared cell (it must exist before it can reference itself).
    {
        let cell = session.borrow().raf_closure.clone();
        let session_for_frame = session.clone();
        let cell_for_frame = cell.clone();
        *cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            {
                let mut s = session_for_frame.borrow_mut();
                if s.torn_down {
                    return;
                }
                let now = window()
                    .and_then(|w| w.performance())
                    .map(|p| p.now())
                    .unwrap_or(0.0);
                s.frame(now);
            }

            // schedule next
            if let Some(w) = window() {
                let cb = cell_for_frame.borrow();
                if let Some(cb) = cb.as_ref() {
                    if let Ok(handle) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        session_for_frame.borrow_mut().raf_handle = Some(handle);
                    }
                }
            }
        }) as Box<dyn FnMut()>));

        let handle = window()
            .ok_or("no window")?
            .request_animation_frame(cell.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;
        session.borrow_mut().raf_handle = Some(handle);
    }

    Ok(())
}

/// Replace the mount's content with a static error panel: the failure
/// message plus a fixed remediation hint.
pub fn show_overlay_error(document: &Document, mount: &HtmlElement, error: &JsValue) {
    let message = error
        .as_string()
        .unwrap_or_else(|| format!("{error:?}"));

    mount.set_inner_html("");
    let Ok(panel) = document.create_element("div") else {
        return;
    };
    panel.set_class_name("viz-error");

    if let Ok(title) = document.create_element("div") {
        title.set_class_name("viz-error-title");
        title.set_text_content(Some("Rendering failed"));
        panel.append_child(&title).ok();
    }
    if let Ok(body) = document.create_element("pre") {
        body.set_class_name("viz-error-message");
        body.set_text_content(Some(&format!(
            "{message}\n\nCheck that the browser supports WebGL2 and that the page's assets are reachable."
        )));
        panel.append_child(&body).ok();
    }
    mount.append_child(&panel).ok();
}
