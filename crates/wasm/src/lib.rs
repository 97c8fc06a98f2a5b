//! WASM bindings for the editor breadcrumb preview
//!
//! The block editor has no authoritative query state, so everything here
//! goes through the heuristic classification path. Inputs and outputs are
//! plain JS objects converted with `serde-wasm-bindgen`.

use ace_breadcrumbs_core::{
    classify, normalize_preview, BreadcrumbResolver, PreviewContext, PreviewRenderer,
    RenderOptions, SiteSnapshot, TrailLabels,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Result envelope for one-shot calls
#[derive(Serialize, Deserialize)]
pub struct WasmPreviewResult {
    pub success: bool,
    pub data: Option<String>,
    pub error: Option<String>,
}

impl WasmPreviewResult {
    fn ok(data: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    fn into_js(self) -> JsValue {
        serde_wasm_bindgen::to_value(&self).unwrap_or(JsValue::NULL)
    }
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn from_js<T: serde::de::DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| "invalid input".to_string())
}

/// Stateful preview bound to one editor instance.
///
/// Re-rendering with a context that normalizes to the same location
/// returns the memoized markup.
#[wasm_bindgen]
pub struct BreadcrumbPreview {
    renderer: PreviewRenderer<SiteSnapshot>,
}

#[wasm_bindgen]
impl BreadcrumbPreview {
    /// Create a preview over a site snapshot with optional render options and labels
    #[wasm_bindgen(constructor)]
    pub fn new(site: JsValue, options: JsValue, labels: JsValue) -> Result<BreadcrumbPreview, JsValue> {
        let site: SiteSnapshot = from_js(site)?;
        let options: RenderOptions = from_js(options)?;
        let labels: TrailLabels = from_js(labels)?;

        let resolver = BreadcrumbResolver::new(site).with_labels(labels);
        Ok(Self {
            renderer: PreviewRenderer::new(resolver, options),
        })
    }

    /// Render markup for the current editor context
    pub fn render(&mut self, context: JsValue) -> Result<String, JsValue> {
        let context: PreviewContext = from_js(context)?;
        Ok(self.renderer.render(&context).to_string())
    }

    /// Resolved trail (scenario and items) for the current editor context
    pub fn trail(&mut self, context: JsValue) -> Result<JsValue, JsValue> {
        let context: PreviewContext = from_js(context)?;
        let trail = self.renderer.trail(&context);
        serde_wasm_bindgen::to_value(trail).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace render options after a block attribute change
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: RenderOptions = from_js(options)?;
        self.renderer.set_options(options);
        Ok(())
    }
}

/// One-shot preview render; returns `{ success, data, error }`
#[wasm_bindgen]
pub fn render_preview_html(site: JsValue, options: JsValue, context: JsValue) -> JsValue {
    let result = match BreadcrumbPreview::new(site, options, JsValue::UNDEFINED)
        .and_then(|mut preview| preview.render(context))
    {
        Ok(html) => WasmPreviewResult::ok(html),
        Err(e) => WasmPreviewResult::err(js_error_message(&e)),
    };
    result.into_js()
}

/// Classify an editor context; `data` holds the scenario as JSON
#[wasm_bindgen]
pub fn classify_preview(context: JsValue) -> JsValue {
    let context: PreviewContext = match from_js(context) {
        Ok(context) => context,
        Err(e) => {
            return WasmPreviewResult::err(js_error_message(&e)).into_js();
        }
    };

    let scenario = classify(&normalize_preview(&context));
    let result = match serde_json::to_string(&scenario) {
        Ok(json) => WasmPreviewResult::ok(json),
        Err(e) => WasmPreviewResult::err(e),
    };
    result.into_js()
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_envelope() {
        let ok = WasmPreviewResult::ok("<nav></nav>".to_string());
        assert!(ok.success);
        assert!(ok.error.is_none());

        let err = WasmPreviewResult::err("bad site");
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("bad site"));
    }

    #[test]
    fn test_version() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    }
}
