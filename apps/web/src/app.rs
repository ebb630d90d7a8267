//! DOM driver.
//!
//! Owns the game session and the page handles. Page events and timer
//! callbacks are turned into session events by [`dispatch`]; the effects the
//! session returns are carried out by [`apply`]. The page is redrawn only
//! from a [`BoardView`].

use std::cell::RefCell;
use std::rc::Rc;

use memory_core::{
    build_deck, Banner, BoardView, Difficulty, Effect, Event, GameSession, Theme, TimerKind, Token,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlSelectElement, Window};

use crate::api::PokeApiClient;
use crate::error::DriverError;
use crate::timers::{TimerHandle, TimerTable};

/// Page elements the driver reads from or writes to.
struct Elements {
    board: HtmlElement,
    start: HtmlButtonElement,
    reset: HtmlButtonElement,
    powerup: HtmlButtonElement,
    difficulty: HtmlSelectElement,
    theme: HtmlSelectElement,
    message: HtmlElement,
    clicks: Element,
    matched: Element,
    total_pairs: Element,
    remaining: Element,
    timer: Element,
}

impl Elements {
    fn find(document: &Document) -> Result<Self, DriverError> {
        Ok(Self {
            board: by_id(document, "game-board")?,
            start: by_id(document, "start-btn")?,
            reset: by_id(document, "reset-btn")?,
            powerup: by_id(document, "powerup-btn")?,
            difficulty: by_id(document, "difficulty")?,
            theme: by_id(document, "theme")?,
            message: by_id(document, "game-message")?,
            clicks: by_id(document, "clicks")?,
            matched: by_id(document, "matched")?,
            total_pairs: by_id(document, "total-pairs")?,
            remaining: by_id(document, "remaining")?,
            timer: by_id(document, "timer")?,
        })
    }
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, DriverError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DriverError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| DriverError::WrongElement(id.to_string()))
}

struct App {
    window: Window,
    document: Document,
    elements: Elements,
    session: GameSession,
    timers: TimerTable<Closure<dyn FnMut()>>,
    client: PokeApiClient,
}

type Shared = Rc<RefCell<App>>;

impl App {
    fn selected_difficulty(&self) -> Difficulty {
        Difficulty::from_str(&self.elements.difficulty.value()).unwrap_or_default()
    }

    fn apply_theme(&self) {
        let theme = Theme::from_str(&self.elements.theme.value()).unwrap_or_default();
        if let Some(body) = self.document.body() {
            body.set_class_name(&theme.body_class());
        }
    }

    fn cancel_timer(&mut self, token: Token) {
        if let Some(handle) = self.timers.cancel(token) {
            clear_timer(&self.window, handle);
        }
    }

    fn cancel_all_timers(&mut self) {
        for handle in self.timers.cancel_all() {
            clear_timer(&self.window, handle);
        }
    }

    fn render(&self) {
        let view = BoardView::from_session(&self.session);
        if let Err(e) = self.render_view(&view) {
            log::error!("Render failed: {:?}", e);
        }
    }

    fn render_view(&self, view: &BoardView) -> Result<(), JsValue> {
        let els = &self.elements;
        els.clicks.set_text_content(Some(&view.clicks.to_string()));
        els.matched.set_text_content(Some(&view.matched.to_string()));
        els.total_pairs
            .set_text_content(Some(&view.total_pairs.to_string()));
        els.remaining
            .set_text_content(Some(&view.remaining.to_string()));
        els.timer.set_text_content(Some(&view.clock));

        els.powerup.set_disabled(!view.powerup_enabled);
        els.powerup
            .set_title(&format!("{} reveal(s) left", view.powerups_left));

        render_board(&self.document, &els.board, view)?;
        render_banner(&self.document, &els.message, view.banner.as_ref())
    }
}

fn clear_timer(window: &Window, handle: TimerHandle) {
    if handle.repeats {
        window.clear_interval_with_handle(handle.id);
    } else {
        window.clear_timeout_with_handle(handle.id);
    }
}

/// Bind the session to the page.
pub fn mount() -> Result<(), DriverError> {
    let window = web_sys::window().ok_or(DriverError::NoWindow)?;
    let document = window.document().ok_or(DriverError::NoDocument)?;
    let elements = Elements::find(&document)?;

    let app = App {
        window,
        document,
        elements,
        session: GameSession::default(),
        timers: TimerTable::default(),
        client: PokeApiClient::default(),
    };
    let app = Rc::new(RefCell::new(app));

    {
        let mut app = app.borrow_mut();
        app.session = GameSession::new(app.selected_difficulty());
    }

    bind_controls(&app)?;
    app.borrow().apply_theme();
    app.borrow().render();

    log::info!("Memory game ready");
    Ok(())
}

/// Feed one event to the session and carry out the resulting effects.
fn dispatch(app: &Shared, event: Event) {
    // The callback running this dispatch still has a live timer, so it is
    // never among the retired ones.
    let retired = app.borrow_mut().timers.take_retired();
    drop(retired);

    let effects = app.borrow_mut().session.handle(event);
    for effect in effects {
        apply(app, effect);
    }
}

fn apply(app: &Shared, effect: Effect) {
    match effect {
        Effect::Render => app.borrow().render(),
        Effect::LoadDeck { token, difficulty } => load_deck(app, token, difficulty),
        Effect::ScheduleTimer { token, kind } => schedule(app, token, kind),
        Effect::CancelTimer(token) => app.borrow_mut().cancel_timer(token),
        Effect::CancelAllTimers => app.borrow_mut().cancel_all_timers(),
    }
}

fn load_deck(app: &Shared, token: Token, difficulty: Difficulty) {
    log::info!("Dealing a {} board...", difficulty.as_str());
    let client = app.borrow().client.clone();
    let app = Rc::clone(app);

    wasm_bindgen_futures::spawn_local(async move {
        let mut rng = rand::rng();
        let deck = build_deck(&client, difficulty, &mut rng).await;
        dispatch(&app, Event::DeckLoaded { token, deck });
    });
}

fn schedule(app: &Shared, token: Token, kind: TimerKind) {
    let window = app.borrow().window.clone();
    let millis = kind.millis() as i32;
    let repeats = kind.repeats();
    let callback_app = Rc::clone(app);

    let callback = Closure::<dyn FnMut()>::new(move || {
        dispatch(&callback_app, Event::TimerFired(token));
        if !repeats {
            callback_app.borrow_mut().timers.finish(token);
        }
    });

    let function = callback.as_ref().unchecked_ref();
    let handle = if repeats {
        window.set_interval_with_callback_and_timeout_and_arguments_0(function, millis)
    } else {
        window.set_timeout_with_callback_and_timeout_and_arguments_0(function, millis)
    };

    match handle {
        Ok(handle) => {
            let handle = TimerHandle {
                id: handle,
                repeats,
            };
            app.borrow_mut().timers.insert(token, handle, callback);
        }
        Err(e) => log::error!("Failed to schedule {:?} timer: {:?}", kind, e),
    }
}

fn bind_controls(app: &Shared) -> Result<(), DriverError> {
    let (board, start, reset, powerup, difficulty, theme, message) = {
        let app = app.borrow();
        let els = &app.elements;
        (
            els.board.clone(),
            els.start.clone(),
            els.reset.clone(),
            els.powerup.clone(),
            els.difficulty.clone(),
            els.theme.clone(),
            els.message.clone(),
        )
    };

    for (target, kind) in [
        (start.unchecked_into::<Element>(), "click"),
        (reset.unchecked_into::<Element>(), "click"),
        (difficulty.unchecked_into::<Element>(), "change"),
    ] {
        let app = Rc::clone(app);
        listen(&target, kind, move |_| {
            let difficulty = app.borrow().selected_difficulty();
            dispatch(&app, Event::Start(difficulty));
        })?;
    }

    {
        let app = Rc::clone(app);
        listen(&powerup, "click", move |_| dispatch(&app, Event::UsePowerup))?;
    }

    {
        let app = Rc::clone(app);
        listen(&theme, "change", move |_| app.borrow().apply_theme())?;
    }

    {
        let app = Rc::clone(app);
        listen(&board, "click", move |event| {
            if let Some(index) = clicked_card(&event) {
                dispatch(&app, Event::CardClicked(index));
            }
        })?;
    }

    {
        let app = Rc::clone(app);
        listen(&message, "click", move |event| {
            if closest(&event, ".btn-close").is_some() {
                dispatch(&app, Event::DismissBanner);
            }
        })?;
    }

    Ok(())
}

fn listen<F>(target: &web_sys::EventTarget, kind: &str, handler: F) -> Result<(), DriverError>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn closest(event: &web_sys::Event, selector: &str) -> Option<Element> {
    let target: Element = event.target()?.dyn_into().ok()?;
    target.closest(selector).ok().flatten()
}

fn clicked_card(event: &web_sys::Event) -> Option<usize> {
    closest(event, ".card")?
        .get_attribute("data-index")?
        .parse()
        .ok()
}

fn render_board(document: &Document, board: &HtmlElement, view: &BoardView) -> Result<(), JsValue> {
    let style = board.style();
    style.set_property("display", "grid")?;
    style.set_property(
        "grid-template-columns",
        &format!("repeat({}, var(--card-size))", view.columns),
    )?;
    style.set_property("row-gap", "0.5rem")?;
    style.set_property("column-gap", "0.25rem")?;
    style.set_property("justify-content", "center")?;
    board.class_list().toggle_with_force("loading", view.loading)?;

    // A new deck always passes through an empty board, so a size change
    // means the cells have to be rebuilt.
    if board.child_element_count() as usize != view.cards.len() {
        board.set_inner_html("");
        for card in &view.cards {
            board.append_child(&card_cell(document, &card.name, &card.image_url, card.index)?)?;
        }
    }

    let cells = board.children();
    for card in &view.cards {
        let Some(element) = cells
            .item(card.index as u32)
            .and_then(|cell| cell.first_element_child())
        else {
            continue;
        };
        let classes = element.class_list();
        classes.toggle_with_force("flipped", card.face_up)?;
        classes.toggle_with_force("matched", card.matched)?;
    }

    Ok(())
}

fn card_cell(document: &Document, name: &str, image_url: &str, index: usize) -> Result<Element, JsValue> {
    let cell = document.create_element("div")?;
    cell.set_class_name("col d-flex justify-content-center");

    let card = document.create_element("div")?;
    card.set_class_name("card");
    card.set_attribute("data-index", &index.to_string())?;
    card.set_attribute("style", "width: var(--card-size); height: var(--card-size);")?;

    let inner = document.create_element("div")?;
    inner.set_class_name("card-inner");

    let front = document.create_element("img")?;
    front.set_class_name("card-front");
    front.set_attribute("src", image_url)?;
    front.set_attribute("alt", name)?;

    let back = document.create_element("div")?;
    back.set_class_name("card-back");

    inner.append_child(&front)?;
    inner.append_child(&back)?;
    card.append_child(&inner)?;
    cell.append_child(&card)?;
    Ok(cell)
}

fn render_banner(document: &Document, message: &HtmlElement, banner: Option<&Banner>) -> Result<(), JsValue> {
    message.set_inner_html("");
    let Some(banner) = banner else {
        return Ok(());
    };

    let alert = document.create_element("div")?;
    alert.set_class_name(&format!(
        "alert alert-{} alert-dismissible fade show",
        banner.kind.as_str()
    ));
    alert.set_attribute("role", "alert")?;

    let heading = document.create_element("strong")?;
    heading.set_text_content(Some(&format!("{} {}", banner.icon, banner.heading)));
    alert.append_child(&heading)?;
    alert.append_with_str_1(&format!(" {}", banner.text))?;

    let close = document.create_element("button")?;
    close.set_attribute("type", "button")?;
    close.set_class_name("btn-close");
    close.set_attribute("aria-label", "Close")?;
    alert.append_child(&close)?;

    message.append_child(&alert)?;
    Ok(())
}
