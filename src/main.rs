//! Gate Flyer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use gate_flyer::audio::{WebAudio, route_events};
    use gate_flyer::renderer::RenderState;
    use gate_flyer::sim::{Game as Session, autopilot};
    use gate_flyer::{Frame, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        audio: WebAudio,
        settings: Settings,
        last_time: f64,
        /// Let the autopilot press the button
        idle_mode: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(session: Session, settings: Settings) -> Self {
            Self {
                audio: WebAudio::new(&settings),
                session,
                render_state: None,
                settings,
                last_time: 0.0,
                idle_mode: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// The one input: jump while playing, restart after game over
        fn primary_action(&mut self) {
            self.audio.resume();
            let command = self.session.primary_action();
            log::debug!("Primary action -> {:?}", command);
        }

        /// Run simulation steps and forward events to audio
        fn update(&mut self, dt: f32, time: f64) {
            if self.idle_mode && autopilot::wants_flap(&self.session.state) {
                self.session.primary_action();
            }
            self.session.advance(dt);

            let events = self.session.drain_events();
            route_events(&events, &mut self.audio);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, frame: &Frame) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self, frame: &Frame) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                if el.text_content().as_deref() != Some(frame.score_text.as_str()) {
                    el.set_text_content(Some(&frame.score_text));
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("message") {
                if frame.message.is_empty() {
                    let _ = el.set_attribute("class", "hidden");
                } else {
                    let _ = el.set_attribute("class", "");
                    if el.text_content().as_deref() != Some(frame.message.as_str()) {
                        el.set_text_content(Some(&frame.message));
                    }
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gate Flyer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let session = match Session::new(settings.game_config(), seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Bad game config ({}), using defaults", e);
                Session::new(Default::default(), seed).expect("default config is valid")
            }
        };
        let game = Rc::new(RefCell::new(Game::new(session, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match RenderState::new(surface, &adapter, width, height).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Failed to create device: {}", e),
                }
            }
            // Keep simulating; the HUD still shows score and messages
            Err(e) => log::error!("No graphics adapter: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_auto_mute(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Gate Flyer running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().primary_action();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().primary_action();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" | "ArrowUp" => {
                        event.prevent_default();
                        g.primary_action();
                    }
                    "i" | "I" => {
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    "m" | "M" => {
                        g.settings.muted = !g.settings.muted;
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        if !settings.muted && g.session.state.is_playing() {
                            use gate_flyer::audio::AudioSink;
                            g.audio.start_ambient();
                        }
                        settings.save();
                        log::info!("Muted: {}", settings.muted);
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            let frame = g.session.frame();
            g.render(&frame);
            g.update_hud(&frame);
        }

        request_animation_frame(game);
    }

    /// Silence the ambient loop while the tab is hidden
    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        use gate_flyer::audio::AudioSink;

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                g.audio.stop_ambient();
                log::info!("Tab hidden, ambient loop paused");
            } else if g.session.state.is_playing() {
                g.audio.start_ambient();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use gate_flyer::audio::{SilentAudio, route_events};
    use gate_flyer::sim::{Game, GameEvent, autopilot};
    use gate_flyer::{GameConfig, consts::SIM_DT};

    env_logger::init();
    log::info!("Gate Flyer (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => 1,
    };
    let seconds: f32 = match args.next() {
        Some(s) => s.parse()?,
        None => 60.0,
    };

    let mut game = Game::new(GameConfig::default(), seed)?;
    let mut audio = SilentAudio::new();
    let mut best = 0;
    let mut runs = 1;

    let total_ticks = (seconds / SIM_DT).round() as u64;
    for _ in 0..total_ticks {
        if autopilot::wants_flap(&game.state) {
            game.primary_action();
        }
        game.advance(SIM_DT);

        let events = game.drain_events();
        route_events(&events, &mut audio);
        for event in &events {
            match event {
                GameEvent::Scored { score } => {
                    best = best.max(*score);
                    log::debug!("Score {}", score);
                }
                GameEvent::Failure { cause } => {
                    log::info!("Run {} over: {:?}, score {}", runs, cause, game.state.score);
                }
                _ => {}
            }
        }

        // Restart right away so the demo keeps going
        if !game.state.is_playing() {
            game.primary_action();
            runs += 1;
        }
    }

    log::info!("Demo finished: {} runs, best score {}", runs, best);
    println!("{}", serde_json::to_string_pretty(&game.frame())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
