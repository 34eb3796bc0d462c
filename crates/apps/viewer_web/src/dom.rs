use controller::config::ElementIds;
use controller::surface::MapSurface;
use foundation::color::Hsl;
use foundation::handles::ShapeHandle;
use layers::choropleth::ShapeSurface;
use scene::dataset::Region;
use scene::index::LabelEntry;
use wasm_bindgen::JsValue;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// `MapSurface` over the live document.
///
/// The map element is expected to be an `<svg>`; region paths and the border
/// mesh are appended to it. Filter controls are `<button>`s carrying a
/// `data-index` attribute so the page can forward clicks to `on_filter_click`.
pub struct DomSurface {
    document: Document,
    ids: ElementIds,
    shapes: Vec<Element>,
    filters: Vec<Element>,
}

impl DomSurface {
    pub fn new(document: Document, ids: ElementIds) -> Self {
        Self {
            document,
            ids,
            shapes: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn from_window(ids: ElementIds) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self::new(document, ids))
    }

    fn element(&self, id: &str) -> Result<Element, JsValue> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement, JsValue> {
        self.element(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
    }

    fn date_input(&self) -> Result<HtmlInputElement, JsValue> {
        self.element(&self.ids.date_range)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str("date range is not an <input>"))
    }

    fn append_path(&self, path: &str, class: &str) -> Result<Element, JsValue> {
        let el = self.document.create_element_ns(Some(SVG_NS), "path")?;
        el.set_attribute("d", path)?;
        el.set_attribute("class", class)?;
        self.element(&self.ids.map)?.append_child(&el)?;
        Ok(el)
    }

    fn try_build_filter_controls(&mut self, labels: &[LabelEntry]) -> Result<(), JsValue> {
        let container = self.element(&self.ids.filters)?;
        container.set_inner_html("");
        self.filters.clear();
        for (i, label) in labels.iter().enumerate() {
            let button = self.document.create_element("button")?;
            button.set_attribute("class", "filter")?;
            button.set_attribute("data-index", &i.to_string())?;
            button.set_attribute("data-label", &label.key)?;
            button.set_text_content(Some(&label.text));
            container.append_child(&button)?;
            self.filters.push(button);
        }
        Ok(())
    }

    fn try_build_date_range(&self, min: usize, max: usize, value: usize) -> Result<(), JsValue> {
        let input = self.date_input()?;
        input.set_type("range");
        input.set_min(&min.to_string());
        input.set_max(&max.to_string());
        input.set_step("1");
        input.set_value(&value.to_string());
        Ok(())
    }

    fn try_show_tooltip(&self, html: &str) -> Result<(), JsValue> {
        let tooltip = self.html_element(&self.ids.tooltip)?;
        tooltip.set_inner_html(html);
        tooltip.style().set_property("opacity", "1")?;
        Ok(())
    }

    fn try_move_tooltip(&self, x: f64, y: f64) -> Result<(), JsValue> {
        let style = self.html_element(&self.ids.tooltip)?.style();
        style.set_property("left", &format!("{x}px"))?;
        style.set_property("top", &format!("{y}px"))?;
        Ok(())
    }
}

pub(crate) fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        web_sys::console::log_1(&err);
    }
}

impl ShapeSurface for DomSurface {
    fn create_region_shape(
        &mut self,
        position: usize,
        region: &Region,
        path: &str,
    ) -> Result<ShapeHandle, String> {
        let el = self.append_path(path, "region").map_err(js_reason)?;
        el.set_attribute("data-id", region.id.as_str())
            .map_err(js_reason)?;
        self.shapes.push(el);
        Ok(ShapeHandle::new(position as u32, 0))
    }

    fn draw_borders(&mut self, path: &str) -> Result<(), String> {
        self.append_path(path, "borders").map(|_| ()).map_err(js_reason)
    }

    fn transition_fill(&mut self, shape: ShapeHandle, fill: Hsl, duration_ms: u32) {
        let Some(el) = self.shapes.get(shape.index() as usize) else {
            return;
        };
        report(el.set_attribute(
            "style",
            &format!("fill: {fill}; transition: fill {duration_ms}ms"),
        ));
    }
}

impl MapSurface for DomSurface {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn build_filter_controls(&mut self, labels: &[LabelEntry]) {
        report(self.try_build_filter_controls(labels));
    }

    fn set_filter_active(&mut self, index: usize, active: bool) {
        if let Some(button) = self.filters.get(index) {
            report(
                button
                    .class_list()
                    .toggle_with_force("active", active)
                    .map(|_| ()),
            );
        }
    }

    fn build_date_range(&mut self, min: usize, max: usize, value: usize) {
        report(self.try_build_date_range(min, max, value));
    }

    fn set_date_range_value(&mut self, value: usize) {
        report(self.date_input().map(|input| input.set_value(&value.to_string())));
    }

    fn set_current_date_text(&mut self, text: &str) {
        report(
            self.element(&self.ids.current_date)
                .map(|el| el.set_text_content(Some(text))),
        );
    }

    fn show_tooltip(&mut self, html: &str) {
        report(self.try_show_tooltip(html));
    }

    fn move_tooltip(&mut self, x: f64, y: f64) {
        report(self.try_move_tooltip(x, y));
    }

    fn hide_tooltip(&mut self) {
        report(
            self.html_element(&self.ids.tooltip)
                .and_then(|t| t.style().set_property("opacity", "0")),
        );
    }

    fn tooltip_height(&self) -> f64 {
        self.html_element(&self.ids.tooltip)
            .map(|t| f64::from(t.offset_height()))
            .unwrap_or(0.0)
    }
}
