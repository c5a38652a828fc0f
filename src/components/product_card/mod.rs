//! Interactive product card with a canvas particle overlay.
//!
//! - Pointer-driven 3-D tilt, layered parallax and a following light
//! - Spark bursts fired from the call-to-action button
//! - A drifting ambient particle field sized to the viewport
//! - Device-pixel-ratio aware drawing surface
//!
//! The engine ([`CardFx`]) is plain Rust over a [`Surface`] trait, so it runs
//! headless against [`PixelSurface`] as well as on a real canvas.
//!
//! # Example
//!
//! ```ignore
//! use product_card_fx::{FxConfig, ProductCard};
//!
//! view! {
//!     <ProductCard config=FxConfig::default() cta="Buy now">
//!         <h2>"Aurora Headphones"</h2>
//!     </ProductCard>
//! }
//! ```

mod component;
pub mod config;
mod engine;
pub mod integrate;
pub mod particles;
pub mod pixel;
pub mod pointer;
mod render;
pub mod scheduler;
pub mod surface;
pub mod theme;
pub mod types;

pub use component::ProductCard;
pub use config::{
	AmbientConfig, BurstConfig, BurstShape, ConfigError, ConfigLoadError, EdgePolicy, FxConfig, Span,
};
pub use engine::{CardFx, DEFAULT_SEED, FrameStats};
pub use integrate::Integrator;
pub use particles::{DEATH_THRESHOLD, EntityPool, Motion, Particle, ParticleKind};
pub use pixel::PixelSurface;
pub use pointer::PointerMapper;
pub use render::render;
pub use scheduler::{FRAME_MS, FrameClock, FrameLoop};
pub use surface::{CanvasSurface, Surface, SurfaceState};
pub use theme::{Color, Tint};
pub use types::{ButtonTargets, Normalized, PointerTargets, Tilt};
