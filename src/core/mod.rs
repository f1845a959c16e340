//=========================================================================
// Engine Core
//=========================================================================
//
// Platform-independent engine internals.
//
// Everything in here is deterministic and headless: the core talks to
// windows, GPUs, and speakers only through the traits in `render`,
// `assets`, and `input::source`, which is what lets the whole frame
// pipeline run under plain unit tests.
//
// Submodules:
// - `entity`:  entity model and lifecycle contract
// - `world`:   entity container with deferred add/remove
// - `scene`:   named game states and the scene director
// - `context`: step/draw capability bundles and pass drivers
// - `camera`:  view/viewport transforms and culling
// - `input`:   polled input state
// - `render`:  renderer contract plus null/recording backends
// - `assets`:  asset lookups and the audio contract
// - `math`:    small 2D geometry and direction vocabulary
//
//=========================================================================

pub mod assets;
pub mod camera;
pub mod context;
pub mod entity;
pub mod input;
pub mod math;
pub mod render;
pub mod scene;
pub mod world;
