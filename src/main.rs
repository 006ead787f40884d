//! Polymerge entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_sketch {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use polymerge::Settings;
    use polymerge::renderer::{RenderState, VertexSink};
    use polymerge::sim::{MOUSE_POINTER, PointerTracker, World, tick};

    /// Sketch instance holding all state
    struct Sketch {
        world: World,
        tracker: PointerTracker,
        render_state: Option<RenderState>,
        sink: VertexSink,
    }

    impl Sketch {
        fn new(settings: Settings, width: f32, height: f32) -> Self {
            Self {
                world: World::new(settings, width, height),
                tracker: PointerTracker::new(),
                render_state: None,
                sink: VertexSink::new(),
            }
        }

        /// Advance one frame and paint it
        fn frame(&mut self) {
            tick(&mut self.world);

            self.sink.clear();
            self.world.draw(&mut self.sink);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.sink.vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    /// Settings from the canvas `data-settings` attribute, else defaults
    fn load_settings(canvas: &HtmlCanvasElement) -> Settings {
        let mut settings = match canvas.get_attribute("data-settings") {
            Some(json) => match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from data-settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring data-settings: {}", e);
                    Settings::default()
                }
            },
            None => Settings::default(),
        };
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }
        settings
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Polymerge starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> found");
            return;
        };

        // Simulation runs in CSS pixels, the surface in physical pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = load_settings(&canvas);
        let sketch = Rc::new(RefCell::new(Sketch::new(
            settings,
            client_w as f32,
            client_h as f32,
        )));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, dpr as f32).await {
            Ok(render_state) => sketch.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("{}", e),
        }

        setup_input_handlers(&canvas, sketch.clone());

        request_animation_frame(sketch);

        log::info!("Polymerge running!");
    }

    /// Client (viewport) coordinates relative to the canvas
    fn canvas_pos(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, sketch: Rc<RefCell<Sketch>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse down
        {
            let sketch = sketch.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_pos(&canvas_clone, event.client_x(), event.client_y());
                let s = &mut *sketch.borrow_mut();
                s.tracker.press(&mut s.world, MOUSE_POINTER, pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move and up go to the window so a drag survives leaving the canvas
        {
            let sketch = sketch.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_pos(&canvas_clone, event.client_x(), event.client_y());
                let s = &mut *sketch.borrow_mut();
                s.tracker.moved(&mut s.world, pos);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let sketch = sketch.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let s = &mut *sketch.borrow_mut();
                s.tracker.release(&mut s.world, MOUSE_POINTER);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let sketch = sketch.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let s = &mut *sketch.borrow_mut();
                let changed = event.changed_touches();
                for i in 0..changed.length() {
                    if let Some(touch) = changed.get(i) {
                        let pos =
                            canvas_pos(&canvas_clone, touch.client_x(), touch.client_y());
                        s.tracker.press(&mut s.world, touch.identifier(), pos);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let sketch = sketch.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pos = canvas_pos(&canvas_clone, touch.client_x(), touch.client_y());
                    let s = &mut *sketch.borrow_mut();
                    s.tracker.moved(&mut s.world, pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for event_name in ["touchend", "touchcancel"] {
            let sketch = sketch.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let s = &mut *sketch.borrow_mut();
                let changed = event.changed_touches();
                for i in 0..changed.length() {
                    if let Some(touch) = changed.get(i) {
                        s.tracker.release(&mut s.world, touch.identifier());
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(sketch: Rc<RefCell<Sketch>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            sketch.borrow_mut().frame();
            request_animation_frame(sketch);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_sketch::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Polymerge (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let settings = match parse_args(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            log::error!("Usage: polymerge [--policy chain|single] [settings.json]");
            std::process::exit(1);
        }
    };

    headless::run(settings);
}

/// `[--policy <name>] [settings.json]`; the flag overrides the file
#[cfg(not(target_arch = "wasm32"))]
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<polymerge::Settings, polymerge::SketchError> {
    use polymerge::{MergePolicy, Settings, SketchError};

    let mut policy = None;
    let mut path = None;
    while let Some(arg) = args.next() {
        if arg == "--policy" {
            let name = args.next().unwrap_or_default();
            policy = Some(MergePolicy::parse(&name).ok_or(SketchError::InvalidSettings {
                field: "merge_policy",
                reason: "expected chain or single",
            })?);
        } else {
            path = Some(arg);
        }
    }

    let mut settings = match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| SketchError::SettingsParse(format!("{path}: {e}")))?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };
    if let Some(policy) = policy {
        settings.merge_policy = policy;
    }
    Ok(settings)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: drag shapes of one kind together and release
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use polymerge::Settings;
    use polymerge::renderer::VertexSink;
    use polymerge::sim::{MOUSE_POINTER, PointerTracker, World, tick};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 800.0;
    const SETTLE_FRAMES: u32 = 120;
    const DRAG_FRAMES: u32 = 60;

    pub fn run(mut settings: Settings) {
        if settings.seed.is_none() {
            settings.seed = Some(0x5eed);
        }
        let mut world = World::new(settings, WIDTH, HEIGHT);
        let mut tracker = PointerTracker::new();

        for _ in 0..SETTLE_FRAMES {
            tick(&mut world);
        }

        // Pull every shape sharing the first shape's side count onto one spot
        let Some(first) = world.shapes.first() else {
            log::warn!("Empty world, nothing to do");
            return;
        };
        let sides = first.sides;
        let target = first.pos;
        let kin: Vec<_> = world
            .shapes
            .iter()
            .filter(|s| s.sides == sides && s.level == 1)
            .map(|s| s.id)
            .skip(1)
            .take(2)
            .collect();

        for id in kin {
            let Some(start) = world.shape(id).map(|s| s.pos) else {
                continue;
            };
            tracker.press(&mut world, MOUSE_POINTER, start);
            for f in 1..=DRAG_FRAMES {
                let t = f as f32 / DRAG_FRAMES as f32;
                tracker.moved(&mut world, start.lerp(target + Vec2::new(20.0, 0.0), t));
                tick(&mut world);
            }
            if let Some(report) = tracker.release(&mut world, MOUSE_POINTER) {
                log::info!(
                    "Released: {} created, {} consumed, {} live",
                    report.created.len(),
                    report.consumed,
                    world.shapes.len()
                );
            }
        }

        let mut sink = VertexSink::new();
        world.draw(&mut sink);
        log::info!(
            "Frame {}: {} shapes, {} vertices",
            world.frame,
            world.shapes.len(),
            sink.vertices.len()
        );

        match serde_json::to_string_pretty(&world.shapes) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize shapes: {}", e),
        }
    }
}
