//! Sinapsis entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use sinapsis::sim::{GameEvent, Session};
    use sinapsis::Tuning;

    /// Game instance holding all state
    struct Game {
        session: Session,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                session: Session::seeded(seed, tuning),
                last_time: 0.0,
            }
        }

        /// Advance the virtual clock by the frame delta
        fn update(&mut self, time: f64) {
            let dt_ms = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;
            self.session.advance(dt_ms.round() as u64);
        }

        /// Apply drained events to the DOM
        fn apply_events(&mut self, document: &Document) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::Flash(flash) => {
                        if let Some(drum) = drum_element(document, flash.symbol.index()) {
                            let _ = drum.class_list().add_1("lit");
                        }
                    }
                    GameEvent::FlashEnd(symbol) => {
                        if let Some(drum) = drum_element(document, symbol.index()) {
                            let _ = drum.class_list().remove_1("lit");
                        }
                    }
                    GameEvent::PlaybackStarted { .. } => {
                        hide(document, "message");
                        set_body_class(document, "showing", true);
                    }
                    GameEvent::PlaybackFinished { .. } => {
                        set_body_class(document, "showing", false);
                    }
                    GameEvent::ScoreChanged { score, level } => {
                        set_text(document, "points-val", &score.to_string());
                        set_text(document, "level-val", &level.to_string());
                    }
                    GameEvent::LevelComplete { .. } => {
                        show_message(document, "LEVEL UP!");
                    }
                    GameEvent::Failure { .. } => {
                        set_body_class(document, "showing", false);
                        show_message(document, "WRONG SEQUENCE!");
                    }
                    GameEvent::ReturnToIdle => {
                        hide(document, "message");
                        show(document, "start-screen");
                    }
                }
            }
        }
    }

    fn drum_element(document: &Document, index: usize) -> Option<Element> {
        document
            .query_selector(&format!(".drum[data-index=\"{}\"]", index))
            .ok()
            .flatten()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().remove_1("hidden");
        }
    }

    fn hide(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().add_1("hidden");
        }
    }

    fn show_message(document: &Document, text: &str) {
        set_text(document, "message", text);
        show(document, "message");
    }

    fn set_body_class(document: &Document, class: &str, on: bool) {
        if let Some(body) = document.body() {
            let _ = body.class_list().toggle_with_force(class, on);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sinapsis starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));
        log::info!("Game initialized with seed: {}", seed);

        setup_start_button(&document, game.clone());
        setup_drums(&document, game.clone());

        request_animation_frame(game);

        log::info!("Sinapsis running!");
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                hide(&document, "start-screen");
                show(&document, "hud");
                game.borrow_mut().session.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_drums(document: &Document, game: Rc<RefCell<Game>>) {
        let Ok(drums) = document.query_selector_all(".drum") else {
            log::warn!("No drums found in the page");
            return;
        };

        for i in 0..drums.length() {
            let Some(drum) = drums.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(index) = drum
                .get_attribute("data-index")
                .and_then(|v| v.parse::<usize>().ok())
            else {
                log::warn!("Drum element without a numeric data-index");
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(e) = game.borrow_mut().session.submit_input(index) {
                    log::warn!("Rejected drum hit: {}", e);
                }
            });
            let _ = drum
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let document = web_sys::window().unwrap().document().unwrap();
            let mut g = game.borrow_mut();
            g.update(time);
            g.apply_events(&document);
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
    log::info!("Sinapsis (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    demo_game();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a few perfect levels, then miss on purpose
#[cfg(not(target_arch = "wasm32"))]
fn demo_game() {
    use sinapsis::Tuning;
    use sinapsis::sim::{GameEvent, GamePhase, InputOutcome, Session};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::seeded(seed, Tuning::load());
    let frame_ms = 16;

    session.start();
    for _ in 0..3 {
        while session.state().phase != GamePhase::AwaitingInput {
            session.advance(frame_ms);
        }
        for symbol in session.state().sequence.clone() {
            if let Ok(InputOutcome::LevelComplete { score, level }) =
                session.submit_input(symbol.index())
            {
                println!("Level up! score {score}, level {level}");
            }
        }
    }

    while session.state().phase != GamePhase::AwaitingInput {
        session.advance(frame_ms);
    }
    let wrong = session
        .state()
        .expected_next()
        .map(|s| (s.index() + 1) % usize::from(session.engine().symbol_count()))
        .unwrap_or(0);
    let _ = session.submit_input(wrong);
    session.advance(u64::from(session.tuning().failure_delay_ms));

    for event in session.drain_events() {
        match event {
            GameEvent::Failure { level, score } => {
                println!("Wrong drum! Reached level {level} with {score} points")
            }
            GameEvent::ReturnToIdle => println!("Back to the start screen"),
            other => log::debug!("{:?}", other),
        }
    }
}
