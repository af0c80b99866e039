//! Level Map entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use level_map::app::{Command, LevelMapApp};
    use level_map::audio::AudioManager;
    use level_map::map::catalog;
    use level_map::platform::LocalStorage;
    use level_map::view::{ABOUT_ITEMS, ABOUT_SUMMARY, MapView, NextButton};

    const SVG_NS: &str = "http://www.w3.org/2000/svg";

    /// Elements updated every frame
    struct Dom {
        trail_path: Element,
        nodes: Vec<Element>,
        marker: Element,
        progress_fill: Element,
        progress_label: Element,
        current_label: Element,
        next_btn: Element,
        congrats: Element,
        mute_btn: Element,
        tooltip: Element,
        about: Element,
    }

    /// Map instance holding all state
    struct Game {
        app: LevelMapApp<LocalStorage>,
        audio: AudioManager,
        dom: Dom,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            self.app.frame(time);

            self.audio.set_volume(self.app.settings().effective_volume());
            for cue in self.app.drain_sounds() {
                self.audio.play(cue);
            }
        }

        fn render(&self) {
            render_view(&self.dom, &self.app.view());
        }
    }

    fn create(document: &Document, tag: &str, class: &str, parent: &Element) -> Option<Element> {
        let el = document.create_element(tag).ok()?;
        el.set_attribute("class", class).ok()?;
        parent.append_child(&el).ok()?;
        Some(el)
    }

    fn create_svg(document: &Document, tag: &str, parent: &Element) -> Option<Element> {
        let el = document.create_element_ns(Some(SVG_NS), tag).ok()?;
        parent.append_child(&el).ok()?;
        Some(el)
    }

    fn build_dom(document: &Document, path_d: &str) -> Option<Dom> {
        let root = match document.get_element_by_id("level-map") {
            Some(root) => root,
            None => {
                let root = create(document, "div", "level-map", &document.body()?)?;
                root.set_id("level-map");
                root
            }
        };

        // Toolbar
        let toolbar = create(document, "div", "toolbar", &root)?;
        let mute_btn = create(document, "button", "icon-btn", &toolbar)?;
        mute_btn.set_id("mute-btn");
        mute_btn.set_attribute("title", "Toggle sound (M)").ok()?;
        let about_btn = create(document, "button", "icon-btn", &toolbar)?;
        about_btn.set_id("about-btn");
        about_btn.set_attribute("title", "About (A)").ok()?;
        about_btn.set_text_content(Some("i"));

        // Progress bar
        let progress = create(document, "div", "progress", &root)?;
        let progress_label = create(document, "span", "progress-label", &progress)?;
        let track = create(document, "div", "progress-track", &progress)?;
        let progress_fill = create(document, "div", "progress-fill", &track)?;
        let current_label = create(document, "span", "progress-current", &progress)?;

        // Map area: SVG path underneath, nodes and marker on top
        let board = create(document, "div", "board", &root)?;
        let svg = create_svg(document, "svg", &board)?;
        svg.set_attribute("viewBox", "0 0 100 100").ok()?;
        svg.set_attribute("preserveAspectRatio", "none").ok()?;
        let base_path = create_svg(document, "path", &svg)?;
        for (k, v) in [
            ("stroke", "#000000"),
            ("stroke-width", "6"),
            ("fill", "none"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "round"),
        ] {
            base_path.set_attribute(k, v).ok()?;
        }
        base_path.set_attribute("d", path_d).ok()?;
        let trail_path = create_svg(document, "path", &svg)?;
        for (k, v) in [
            ("stroke", "#DC2626"),
            ("stroke-width", "0.3"),
            ("fill", "none"),
            ("stroke-linecap", "round"),
        ] {
            trail_path.set_attribute(k, v).ok()?;
        }
        trail_path.set_attribute("d", path_d).ok()?;

        let mut nodes = Vec::with_capacity(catalog::all().len());
        for level in catalog::all() {
            let node = create(document, "div", "node", &board)?;
            node.set_attribute("data-level", &level.id.to_string()).ok()?;
            node.set_text_content(Some(&level.id.to_string()));
            nodes.push(node);
        }
        let marker = create(document, "div", "marker", &board)?;

        // Controls
        let controls = create(document, "div", "controls", &root)?;
        let next_btn = create(document, "button", "next-btn", &controls)?;
        let congrats = create(document, "div", "congrats hidden", &controls)?;
        congrats.set_text_content(Some("Congratulations! You've completed all levels!"));
        let reset_btn = create(document, "button", "reset-btn", &controls)?;
        reset_btn.set_id("reset-btn");
        reset_btn.set_text_content(Some("Reset Progress"));

        let tooltip = create(document, "div", "tooltip hidden", &root)?;

        // About dialog
        let about = create(document, "div", "about hidden", &root)?;
        let summary = create(document, "p", "about-summary", &about)?;
        summary.set_text_content(Some(ABOUT_SUMMARY));
        let list = create(document, "dl", "about-items", &about)?;
        for &(label, value) in ABOUT_ITEMS {
            create(document, "dt", "", &list)?.set_text_content(Some(label));
            create(document, "dd", "", &list)?.set_text_content(Some(value));
        }
        let close = create(document, "button", "about-close", &about)?;
        close.set_id("about-close");
        close.set_text_content(Some("Close"));

        next_btn.set_id("next-btn");
        Some(Dom {
            trail_path,
            nodes,
            marker,
            progress_fill,
            progress_label,
            current_label,
            next_btn,
            congrats,
            mute_btn,
            tooltip,
            about,
        })
    }

    fn set_class(el: &Element, class: &str) {
        let _ = el.set_attribute("class", class);
    }

    fn place(el: &Element, x: f32, y: f32) {
        let _ = el.set_attribute("style", &format!("left: {}%; top: {}%;", x, y));
    }

    fn render_view(dom: &Dom, view: &MapView) {
        let (visible, hidden) = view.path.dash;
        let _ = dom
            .trail_path
            .set_attribute("stroke-dasharray", &format!("{} {}", visible, hidden));

        for (el, node) in dom.nodes.iter().zip(&view.nodes) {
            let mut class = format!("node {} {}", node.status.as_str(), node.color.as_str());
            if node.highlighted {
                class.push_str(" unlocking");
            }
            set_class(el, &class);
            place(el, node.position.x, node.position.y);
        }

        place(&dom.marker, view.marker.x, view.marker.y);
        set_class(
            &dom.marker,
            if view.marker_moving { "marker moving" } else { "marker" },
        );

        let _ = dom
            .progress_fill
            .set_attribute("style", &format!("width: {}%;", view.progress.percent));
        dom.progress_label
            .set_text_content(Some(&view.progress.label()));
        dom.current_label.set_text_content(Some(&format!(
            "Current: Level {}",
            view.progress.current_level
        )));

        match view.next_button {
            NextButton::AllComplete => {
                set_class(&dom.next_btn, "next-btn hidden");
                set_class(&dom.congrats, "congrats");
            }
            NextButton::Enabled | NextButton::LastLevelDone | NextButton::Disabled => {
                set_class(&dom.next_btn, "next-btn");
                set_class(&dom.congrats, "congrats hidden");
                dom.next_btn
                    .set_text_content(Some(view.next_button.label()));
                if view.next_button == NextButton::Disabled {
                    let _ = dom.next_btn.set_attribute("disabled", "");
                } else {
                    let _ = dom.next_btn.remove_attribute("disabled");
                }
            }
        }

        dom.mute_btn
            .set_text_content(Some(if view.muted { "Unmute" } else { "Mute" }));

        match &view.tooltip {
            Some(tip) => {
                let stars: String = (0..tip.max_stars)
                    .map(|i| if i < tip.stars { '★' } else { '☆' })
                    .collect();
                let state = if tip.completed {
                    " ✓"
                } else if tip.locked {
                    " 🔒"
                } else {
                    ""
                };
                dom.tooltip.set_text_content(Some(&format!(
                    "Level {}{} | Difficulty: {} | {} | {}",
                    tip.id,
                    state,
                    tip.difficulty.as_str(),
                    stars,
                    tip.description
                )));
                if let Some(level) = catalog::get(tip.id) {
                    place(&dom.tooltip, level.position.x, level.position.y);
                }
                set_class(&dom.tooltip, "tooltip");
            }
            None => set_class(&dom.tooltip, "tooltip hidden"),
        }

        set_class(&dom.about, if view.about_open { "about" } else { "about hidden" });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Level map starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let app = LevelMapApp::new(LocalStorage::open());
        let Some(dom) = build_dom(&document, &app.curve().to_svg_path()) else {
            log::error!("Failed to build the map DOM");
            return;
        };

        let game = Rc::new(RefCell::new(Game {
            app,
            audio: AudioManager::new(),
            dom,
        }));
        game.borrow().render();

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_nodes(game.clone());

        request_animation_frame(game);

        log::info!("Level map running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(command) = Command::from_key(&event.key()) {
                game.borrow_mut().app.handle_command(command);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                action(&mut game.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "next-btn", game.clone(), |g| {
            g.app.handle_command(Command::Advance)
        });
        on_click(document, "reset-btn", game.clone(), |g| {
            g.app.handle_command(Command::Reset)
        });
        on_click(document, "mute-btn", game.clone(), |g| {
            g.app.handle_command(Command::ToggleMute)
        });
        on_click(document, "about-btn", game.clone(), |g| {
            g.app.handle_command(Command::ToggleAbout)
        });
        on_click(document, "about-close", game, |g| g.app.close_about());
    }

    fn setup_nodes(game: Rc<RefCell<Game>>) {
        let nodes: Vec<(u32, Element)> = game
            .borrow()
            .dom
            .nodes
            .iter()
            .zip(catalog::all())
            .map(|(el, level)| (level.id, el.clone()))
            .collect();

        for (id, el) in nodes {
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let url = game.borrow().app.select_level(id);
                    if let (Some(url), Some(window)) = (url, web_sys::window()) {
                        let _ = window.location().set_href(&url);
                    }
                });
                let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().app.set_hovered(Some(id));
                });
                let _ = el
                    .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    if g.app.hovered() == Some(id) {
                        g.app.set_hovered(None);
                    }
                });
                let _ = el
                    .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Level map (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk the whole map with a fixed frame step and print each stop
#[cfg(not(target_arch = "wasm32"))]
fn run_demo() {
    use level_map::persistence::{MemoryStore, record_completion};
    use level_map::{Command, LevelMapApp};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    // Pretend the first level was finished on a previous visit
    let mut store = MemoryStore::new();
    record_completion(&mut store, 1);

    let mut app = LevelMapApp::new(store);
    let mut now = 0.0;

    while app.progression().can_advance() {
        app.handle_command(Command::Advance);
        while app.progression().is_moving() {
            app.frame(now);
            now += FRAME_MS;
        }
        app.frame(now);

        let view = app.view();
        println!(
            "level {} | {} | path {:>5.1}% | cues {:?}",
            view.progress.current_level,
            view.progress.label(),
            view.path.reveal * 100.0,
            app.drain_sounds()
        );
    }

    match serde_json::to_string(&app.progression().snapshot()) {
        Ok(json) => println!("final state: {}", json),
        Err(e) => log::warn!("Failed to serialize final state: {}", e),
    }

    app.handle_command(Command::Reset);
    println!("after reset: level {}", app.progression().current_level());
}
