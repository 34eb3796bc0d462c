use layers::choropleth::ShapeSurface;
use scene::index::LabelEntry;
use serde::Serialize;

/// DOM-equivalent output surface driven by the controller.
///
/// Element lookups use the ids from [`crate::config::ElementIds`]; how those
/// map onto real elements is up to the implementation.
pub trait MapSurface: ShapeSurface {
    fn has_element(&self, id: &str) -> bool;

    /// Creates one filter control per label, in order. Control `i` reports
    /// clicks as `EventTarget::FilterControl(i)`.
    fn build_filter_controls(&mut self, labels: &[LabelEntry]);
    fn set_filter_active(&mut self, index: usize, active: bool);

    fn build_date_range(&mut self, min: usize, max: usize, value: usize);
    fn set_date_range_value(&mut self, value: usize);
    fn set_current_date_text(&mut self, text: &str);

    fn show_tooltip(&mut self, html: &str);
    fn move_tooltip(&mut self, x: f64, y: f64);
    fn hide_tooltip(&mut self);
    /// Rendered height of the tooltip in pixels, measured after `show_tooltip`.
    fn tooltip_height(&self) -> f64;
}

/// Values available to the tooltip template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    /// The region's value for the current date and label.
    pub data: f64,
    /// Display text of the current label.
    pub label: String,
    /// Display name of the region.
    pub state: String,
}

/// Template-expansion collaborator producing tooltip markup.
pub trait TooltipTemplate {
    fn render(&self, content: &TooltipContent) -> Result<String, String>;
}

impl<F> TooltipTemplate for F
where
    F: Fn(&TooltipContent) -> Result<String, String>,
{
    fn render(&self, content: &TooltipContent) -> Result<String, String> {
        self(content)
    }
}

/// Built-in markup: region name in bold, then `label: value`.
#[derive(Debug, Default, Copy, Clone)]
pub struct PlainTooltip;

impl TooltipTemplate for PlainTooltip {
    fn render(&self, content: &TooltipContent) -> Result<String, String> {
        Ok(format!(
            "<strong>{}</strong><br>{}: {}",
            escape_html(&content.state),
            escape_html(&content.label),
            content.data
        ))
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
