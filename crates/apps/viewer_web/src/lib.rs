use console_error_panic_hook::set_once;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use controller::{MapConfig, MapController, MapSetup, PlainTooltip, TooltipContent, TooltipTemplate};
use layers::choropleth::GeoPath;
use runtime::input::{EventOutcome, EventTarget, InputEvent};
use scene::dataset::Dataset;
use scene::geometry::{FeatureCollection, Geometry};
use scene::index::TitleCaseLabels;

mod dom;
use dom::{DomSurface, js_reason};

thread_local! {
    static STATE: RefCell<Option<MapController<DomSurface>>> = const { RefCell::new(None) };
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js(json: &str) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(json)
}

/// Page-supplied projection: `path_fn(geometry) -> string`.
///
/// A throw or a non-string result fails the mount.
struct JsGeoPath(js_sys::Function);

impl GeoPath for JsGeoPath {
    fn path(&self, geometry: &Geometry) -> Result<String, String> {
        to_js(&geometry.as_json().to_string())
            .and_then(|g| self.0.call1(&JsValue::NULL, &g))
            .map_err(js_reason)?
            .as_string()
            .ok_or_else(|| "path_fn did not return a string".to_string())
    }
}

/// Page-supplied template: `template_fn({ data, label, state }) -> string`.
struct JsTemplate(js_sys::Function);

impl TooltipTemplate for JsTemplate {
    fn render(&self, content: &TooltipContent) -> Result<String, String> {
        let json = serde_json::to_string(content).map_err(|e| e.to_string())?;
        let arg = to_js(&json).map_err(|e| format!("{e:?}"))?;
        self.0
            .call1(&JsValue::NULL, &arg)
            .map_err(|e| format!("{e:?}"))?
            .as_string()
            .ok_or_else(|| "template did not return a string".to_string())
    }
}

fn parse_config(json: &str) -> Result<MapConfig, JsValue> {
    if json.trim().is_empty() {
        return Ok(MapConfig::default());
    }
    MapConfig::from_json(json).map_err(js_err)
}

fn optional_json<T: serde::de::DeserializeOwned>(json: Option<String>) -> Result<Option<T>, JsValue> {
    match json.filter(|s| !s.trim().is_empty()) {
        Some(s) => serde_json::from_str(&s).map(Some).map_err(js_err),
        None => Ok(None),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Builds the map into the page.
///
/// `features_json` may be omitted when every region carries its own geometry;
/// `template_fn` falls back to a plain name/label/value tooltip.
#[wasm_bindgen]
pub fn mount(
    config_json: &str,
    dataset_json: &str,
    features_json: Option<String>,
    mesh_json: Option<String>,
    path_fn: js_sys::Function,
    template_fn: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    let config = parse_config(config_json)?;
    let dataset: Dataset = serde_json::from_str(dataset_json).map_err(js_err)?;
    let features: Option<FeatureCollection> = optional_json(features_json)?;
    let border_mesh: Option<Geometry> = optional_json(mesh_json)?;

    let template: Box<dyn TooltipTemplate> = match template_fn {
        Some(f) => Box::new(JsTemplate(f)),
        None => Box::new(PlainTooltip),
    };
    let path = JsGeoPath(path_fn);
    let surface = DomSurface::from_window(config.elements.clone())?;

    let controller = MapController::new(
        MapSetup {
            config,
            dataset,
            features,
            border_mesh,
            path: &path,
            labels: &TitleCaseLabels,
            template,
        },
        surface,
    )
    .map_err(js_err)?;

    STATE.with(|state| *state.borrow_mut() = Some(controller));
    Ok(())
}

/// Per-event failures are logged and leave the map usable.
fn dispatch(event: InputEvent) -> Result<EventOutcome, JsValue> {
    STATE.with(|state| -> Result<EventOutcome, JsValue> {
        let mut state = state.borrow_mut();
        let controller = state
            .as_mut()
            .ok_or_else(|| JsValue::from_str("map is not mounted"))?;
        match controller.handle(&event) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let msg = format!("{} event failed: {err}", event.kind().as_str());
                web_sys::console::log_1(&JsValue::from_str(&msg));
                Ok(EventOutcome::ignored())
            }
        }
    })
}

#[wasm_bindgen]
pub fn on_filter_click(index: usize) -> Result<(), JsValue> {
    dispatch(InputEvent::click(EventTarget::FilterControl(index))).map(|_| ())
}

#[wasm_bindgen]
pub fn on_date_change(value: String) -> Result<(), JsValue> {
    dispatch(InputEvent::change(EventTarget::DateRange, value)).map(|_| ())
}

/// Returns `true` when the page should call `preventDefault()`.
#[wasm_bindgen]
pub fn on_key_down(key_code: u32) -> Result<bool, JsValue> {
    dispatch(InputEvent::key_down(key_code)).map(|o| o.prevent_default)
}

#[wasm_bindgen]
pub fn on_region_over(id: &str, page_x: f64, page_y: f64) -> Result<(), JsValue> {
    dispatch(InputEvent::mouse_over(id, page_x, page_y)).map(|_| ())
}

#[wasm_bindgen]
pub fn on_region_move(id: &str, page_x: f64, page_y: f64) -> Result<(), JsValue> {
    dispatch(InputEvent::mouse_move(id, page_x, page_y)).map(|_| ())
}

#[wasm_bindgen]
pub fn on_region_out(id: &str) -> Result<(), JsValue> {
    dispatch(InputEvent::mouse_out(id)).map(|_| ())
}

/// Current selection as JSON, for the page or for debugging.
#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    STATE.with(|state| -> Result<String, JsValue> {
        let state = state.borrow();
        let controller = state
            .as_ref()
            .ok_or_else(|| JsValue::from_str("map is not mounted"))?;
        serde_json::to_string(&controller.snapshot()).map_err(js_err)
    })
}

/// Resolved projection parameters for the page's path function:
/// `{ kind, scale, translate, width, height }`.
#[wasm_bindgen]
pub fn projection(config_json: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let p = config.projection;
    let resolved = serde_json::json!({
        "kind": p.kind,
        "scale": p.scale,
        "translate": p.translate_for(config.canvas),
        "width": config.canvas.width,
        "height": config.canvas.height,
    });
    Ok(resolved.to_string())
}
