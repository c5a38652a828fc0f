//! Leptos component wiring the card effects to the DOM.
//!
//! The component renders a full-viewport canvas overlay and the card itself.
//! Mouse handlers feed the engine and push the resulting targets into signals;
//! CSS transitions on the card, layers and button do the easing. A
//! `requestAnimationFrame` loop ticks the engine once per display refresh.
//!
//! Teardown is by ownership: the frame loop and the resize listener live in
//! the effect's state and are cancelled/removed when it is disposed.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::config::FxConfig;
use super::engine::CardFx;
use super::scheduler::FrameLoop;
use super::surface::CanvasSurface;
use super::types::{ButtonTargets, PointerTargets};

type SharedFx = Rc<RefCell<Option<CardFx<CanvasSurface>>>>;

/// Window event listener removed on drop.
struct WindowListener {
	event: &'static str,
	callback: Closure<dyn FnMut()>,
}

impl WindowListener {
	fn add(window: &Window, event: &'static str, f: impl FnMut() + 'static) -> Option<Self> {
		let callback = Closure::<dyn FnMut()>::new(f);
		window
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self { event, callback })
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
		}
	}
}

/// Handles that must outlive the mount and die with it.
struct Mounted {
	_frame_loop: FrameLoop,
	_resize: Option<WindowListener>,
}

fn viewport(window: &Window) -> (f64, f64, f64) {
	let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(w, h, window.device_pixel_ratio())
}

fn client_rect(el: &Element) -> Rect {
	let r = el.get_bounding_client_rect();
	Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

/// Gleam centre as `--x`/`--y` percentages for the button's CSS.
fn set_gleam(el: &HtmlElement, targets: ButtonTargets) {
	let style = el.style();
	let _ = style.set_property("--x", &format!("{}%", targets.gleam.x));
	let _ = style.set_property("--y", &format!("{}%", targets.gleam.y));
}

/// Touch-only devices get no hover tilt.
fn hover_unavailable(window: &Window) -> bool {
	window
		.match_media("(hover: none)")
		.ok()
		.flatten()
		.map(|m| m.matches())
		.unwrap_or(false)
}

/// Product card with pointer tilt, parallax layers and spark bursts.
///
/// `children` fill the card body. Clicking the call-to-action button fires a
/// burst from its centre on the canvas overlay.
#[component]
pub fn ProductCard(
	#[prop(optional)] config: FxConfig,
	#[prop(into, default = "Add to cart".into())] cta: String,
	#[prop(optional)] children: Option<Children>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene_ref = NodeRef::<leptos::html::Div>::new();
	let button_ref = NodeRef::<leptos::html::Button>::new();

	let layer_count = config.layer_depths.len();
	let (targets, set_targets) = signal(PointerTargets::neutral(layer_count));
	let (magnet, set_magnet) = signal(Vec2::ZERO);
	let touch = web_sys::window()
		.map(|w| hover_unavailable(&w))
		.unwrap_or(false);

	let fx: SharedFx = Rc::new(RefCell::new(None));
	let mounted: Rc<RefCell<Option<Mounted>>> = Rc::new(RefCell::new(None));
	let (fx_init, mounted_init) = (fx.clone(), mounted.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let surface = CanvasSurface::from_canvas(canvas);
		if surface.is_none() {
			warn!("product card: no 2-D canvas context, particles will not be drawn");
		}

		let mut engine_config = config.clone();
		if engine_config.seed.is_none() {
			engine_config.seed = Some(js_sys::Date::now() as u64);
		}
		let mut engine = CardFx::new(engine_config, surface);
		let (w, h, dpr) = viewport(&window);
		engine.on_viewport_resize(w, h, dpr);
		*fx_init.borrow_mut() = Some(engine);

		let fx_resize = Rc::downgrade(&fx_init);
		let resize = WindowListener::add(&window, "resize", move || {
			let (Some(fx), Some(win)) = (fx_resize.upgrade(), web_sys::window()) else {
				return;
			};
			let (w, h, dpr) = viewport(&win);
			if let Some(ref mut e) = *fx.borrow_mut() {
				e.on_viewport_resize(w, h, dpr);
			}
		});
		if resize.is_none() {
			warn!("product card: could not listen for resize");
		}

		let fx_frame = Rc::downgrade(&fx_init);
		let frame_loop = FrameLoop::start(move |timestamp| {
			let Some(fx) = fx_frame.upgrade() else {
				return;
			};
			if let Some(ref mut e) = *fx.borrow_mut() {
				e.tick_at(timestamp);
			}
		});

		*mounted_init.borrow_mut() = Some(Mounted {
			_frame_loop: frame_loop,
			_resize: resize,
		});
	});

	let fx_mm = fx.clone();
	let on_scene_move = move |ev: MouseEvent| {
		if touch {
			return;
		}
		let Some(scene) = scene_ref.get() else {
			return;
		};
		let rect = client_rect(&scene);
		let client = Point::new(ev.client_x() as f64, ev.client_y() as f64);
		let next = fx_mm
			.borrow_mut()
			.as_mut()
			.and_then(|e| e.on_pointer_move(client, rect));
		if let Some(t) = next {
			set_targets.set(t);
		}
	};

	let fx_ml = fx.clone();
	let on_scene_leave = move |_: MouseEvent| {
		if let Some(ref mut e) = *fx_ml.borrow_mut() {
			set_targets.set(e.on_pointer_leave());
		}
	};

	let fx_bm = fx.clone();
	let on_button_move = move |ev: MouseEvent| {
		if touch {
			return;
		}
		let Some(button) = button_ref.get() else {
			return;
		};
		let rect = client_rect(&button);
		let client = Point::new(ev.client_x() as f64, ev.client_y() as f64);
		let next = fx_bm
			.borrow_mut()
			.as_mut()
			.and_then(|e| e.on_button_move(client, rect));
		if let Some(targets) = next {
			set_gleam(&button, targets);
			set_magnet.set(targets.lean);
		}
	};

	let fx_bl = fx.clone();
	let on_button_leave = move |_: MouseEvent| {
		if let Some(ref mut e) = *fx_bl.borrow_mut() {
			let rest = e.on_button_leave();
			if let Some(button) = button_ref.get() {
				set_gleam(&button, rest);
			}
			set_magnet.set(rest.lean);
		}
	};

	let fx_click = fx.clone();
	let on_button_click = move |_: MouseEvent| {
		let Some(button) = button_ref.get() else {
			return;
		};
		// The overlay covers the viewport, so client coordinates are logical ones.
		let origin = client_rect(&button).center();
		if let Some(ref mut e) = *fx_click.borrow_mut() {
			e.on_interaction_trigger(origin.x, origin.y);
		}
	};

	let layers = (0..layer_count)
		.map(|i| {
			view! {
				<div
					class=format!("parallax layer layer-{i}")
					style:transform=move || {
						let offset = targets
							.with(|t| t.layers.get(i).copied().unwrap_or(Vec2::ZERO));
						format!("translate3d({}px, {}px, 0)", offset.x, offset.y)
					}
					style:transition="transform 0.6s cubic-bezier(0.22, 1, 0.36, 1)"
				/>
			}
		})
		.collect_view();

	view! {
		<canvas
			node_ref=canvas_ref
			class="fx-canvas"
			style="position: fixed; inset: 0; width: 100%; height: 100%; pointer-events: none; z-index: 3;"
		/>
		<div
			node_ref=scene_ref
			class="card-scene"
			on:mousemove=on_scene_move
			on:mouseleave=on_scene_leave
		>
			<div
				class="dynamic-light"
				style:transform=move || {
					let p = targets.with(|t| t.light).unwrap_or(Point::ZERO);
					format!("translate({}px, {}px)", p.x, p.y)
				}
				style:opacity=move || if targets.with(|t| t.light.is_some()) { "1" } else { "0" }
			/>
			<div
				class="product-card"
				style:transform=move || targets.with(|t| t.tilt.to_css())
				style:transition="transform 0.6s cubic-bezier(0.22, 1, 0.36, 1)"
			>
				<div
					class="card-shine"
					style:background=move || {
						let s = targets.with(|t| t.shine);
						format!(
							"radial-gradient(circle at {}% {}%, rgba(255,255,255,0.35), transparent 40%)",
							s.x,
							s.y,
						)
					}
					style:opacity=move || if targets.with(|t| t.light.is_some()) { "0.6" } else { "0" }
				/>
				{layers}
				<div class="card-body">{children.map(|c| c())}</div>
				<button
					node_ref=button_ref
					class="btn"
					on:click=on_button_click
					on:mousemove=on_button_move
					on:mouseleave=on_button_leave
					style:transform=move || {
						let m = magnet.get();
						format!("translate({}px, {}px)", m.x, m.y)
					}
					style:transition="transform 0.2s ease-out"
				>
					{cta}
				</button>
			</div>
		</div>
	}
}
