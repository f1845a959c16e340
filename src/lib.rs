//=========================================================================
// Glimmer Engine: Library Root
//
// This crate defines the public API surface of the Glimmer Engine: a
// minimal 2D game engine built around scenes, entities with a fixed
// lifecycle, depth-sorted drawing, cameras, and a paced frame loop.
//
// Responsibilities:
// - Expose the engine facade (`Engine` / `EngineBuilder`)
// - Expose the core vocabulary games implement against (`Entity`,
//   `Scene`, contexts, cameras, input)
// - Keep OS integration behind the `platform` module's event-source
//   seam so games and tests can run fully headless
//
// Typical usage:
// ```no_run
// use glimmer_engine::{EngineBuilder, EngineError, Scene};
// use glimmer_engine::core::entity::EntityKind;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Kind { Player, Enemy }
// impl EntityKind for Kind {}
//
// struct Title;
// impl Scene<Kind> for Title {}
//
// fn main() -> Result<(), EngineError> {
//     let mut engine = EngineBuilder::<Kind>::new()
//         .with_title("My Game")
//         .build();
//     engine.register_scene("title", Title);
//     engine.init_scene("title")?;
//     engine.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine systems games build on (entities, scenes,
// cameras, input, rendering contracts). `platform` holds the Winit
// integration; it is public so applications can construct or replace
// the default event source, but most code never touches it.
//
pub mod core;
pub mod platform;

mod engine;

//--- Public Exports ------------------------------------------------------
//
// The facade plus the two traits every game implements, so typical
// applications get by with `use glimmer_engine::{...}` alone.
//
pub use crate::core::entity::Entity;
pub use crate::core::scene::Scene;
pub use engine::{Engine, EngineBuilder, EngineError};
