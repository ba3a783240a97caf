use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use pitch_report_core::share::{encode_path_segment, resolve_route, strip_token, ReportRoute};
use pitch_report_core::viewer::LoadTicket;
use pitch_report_core::{ReportDocument, ReportError};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Request, RequestInit, RequestMode, Response};

mod animation;
mod state;
mod view;

use state::{Command, WebState};

/// API origin baked in at build time; empty means the page's own origin.
const API_BASE: &str = match option_env!("REPORT_API_URL") {
    Some(url) => url,
    None => "",
};

fn main() -> io::Result<()> {
    let (route, origin) = current_route();
    let state = Rc::new(RefCell::new(WebState::new(route)));

    start_load(&state);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| {
            let command = state
                .borrow_mut()
                .handle_key(&event.code, js_sys::Date::now(), &origin);
            match command {
                Some(Command::Reload) => start_load(&state),
                Some(Command::CopyShareLink(url)) => {
                    let copied = copy_to_clipboard(&url);
                    state.borrow_mut().status = if copied {
                        format!("Share link copied: {url}")
                    } else {
                        format!("Share link: {url}")
                    };
                }
                None => {}
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut state = state.borrow_mut();
        state.tick(js_sys::Date::now());
        view::render(&state, f);
    });

    Ok(())
}

/// Route and origin of the page. A validated share token is removed from the address bar.
fn current_route() -> (ReportRoute, String) {
    let Some(window) = web_sys::window() else {
        return (ReportRoute::Missing, String::new());
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_default();
    let query = location.search().unwrap_or_default();
    let origin = location.origin().unwrap_or_default();

    let route = resolve_route(&path, &query);
    if matches!(route, ReportRoute::Shared(_)) {
        let cleaned = format!("{path}{}", strip_token(&query));
        let replaced = window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&cleaned)));
        if replaced.is_err() {
            web_sys::console::error_1(&"Failed to clear share token from URL".into());
        }
    }
    (route, origin)
}

fn start_load(state: &Rc<RefCell<WebState>>) {
    let Some(ticket) = state.borrow_mut().begin_load() else {
        return;
    };
    spawn_local(fetch_report(state.clone(), ticket));
}

async fn fetch_report(state: Rc<RefCell<WebState>>, ticket: LoadTicket) {
    let result = request_report(ticket.report_id()).await;
    if let Err(error) = &result {
        web_sys::console::error_1(&format!("Failed to load report: {error}").into());
    }
    state.borrow_mut().finish_load(&ticket, result);
}

fn transport(context: &str, value: &JsValue) -> ReportError {
    ReportError::Transport(format!("{context}: {value:?}"))
}

fn report_url(report_id: &str) -> String {
    format!("{API_BASE}/api/report/{}", encode_path_segment(report_id))
}

async fn request_report(report_id: &str) -> Result<ReportDocument, ReportError> {
    let Some(window) = web_sys::window() else {
        return Err(ReportError::Transport("no browser window".to_string()));
    };

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let url = report_url(report_id);
    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| transport("Failed to build request", &e))?;
    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| transport("Failed to fetch report", &e))?;
    let Ok(response) = response_value.dyn_into::<Response>() else {
        return Err(ReportError::Transport("Failed to read response".to_string()));
    };

    match response.status() {
        404 => return Err(ReportError::NotFound),
        status if !response.ok() => return Err(ReportError::Http { status }),
        _ => {}
    }

    let body = response
        .json()
        .map_err(|e| transport("Failed to read body", &e))?;
    let json = wasm_bindgen_futures::JsFuture::from(body)
        .await
        .map_err(|e| ReportError::MalformedBody(format!("{e:?}")))?;
    let value = serde_wasm_bindgen::from_value::<serde_json::Value>(json)
        .map_err(|e| ReportError::MalformedBody(e.to_string()))?;
    ReportDocument::from_value(&value)
}

/// Starts `navigator.clipboard.writeText(text)`; false when the API is unavailable.
fn copy_to_clipboard(text: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let navigator = window.navigator();
    let Ok(clipboard) = js_sys::Reflect::get(&navigator, &"clipboard".into()) else {
        return false;
    };
    if clipboard.is_undefined() {
        return false;
    }
    let Ok(write_text) = js_sys::Reflect::get(&clipboard, &"writeText".into()) else {
        return false;
    };
    let Ok(write_text) = write_text.dyn_into::<js_sys::Function>() else {
        return false;
    };
    match write_text.call1(&clipboard, &JsValue::from_str(text)) {
        Ok(_) => true,
        Err(e) => {
            web_sys::console::error_1(&e);
            false
        }
    }
}
