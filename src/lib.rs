//! product-card-fx: interactive product card with a canvas particle engine.
//!
//! This crate provides a WASM-based card component with pointer tilt,
//! parallax layers, spark bursts and an ambient particle field.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::product_card::{
	CardFx, ConfigError, ConfigLoadError, FxConfig, PixelSurface, ProductCard, Surface,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("card-fx: logging initialized");
}

/// Load effect tuning from a script element with id="card-fx-config".
/// Expected format: JSON object, every field optional.
fn load_config() -> Option<FxConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("card-fx-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match FxConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"card-fx: loaded config, {} ambient, {} per burst",
				config.ambient.count, config.burst.count
			);
			Some(config)
		}
		Err(e) => {
			warn!("card-fx: ignoring config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads tuning from the DOM and renders a single product card.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Product Card" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="card-page">
			<ProductCard config=config cta="Add to cart">
				<span class="badge">"New"</span>
				<h2 class="product-name">"Aurora Headphones"</h2>
				<p class="product-blurb">"Move the pointer across the card. Click the button for sparks."</p>
				<p class="price">"$249"</p>
			</ProductCard>
		</main>
	}
}
