//! Overlap-free tile layout and bounded canvas panning.
//!
//! Callers hand the crate an ordered list of rectangle sizes; a decaying-energy
//! relaxation pushes overlapping rectangles apart until none overlap, and the
//! final centers come back in input order. Independently, a drag controller
//! turns pointer deltas into a world offset that rubber-bands past the content
//! bounds and springs back on release. Presentation is the host's job: it feeds
//! measurements and pointer events in and applies the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing facade, [`engine::EngineCore`] |
//! | [`driver`] | Cooperative layout runs, cancellation, result handles |
//! | [`simulation`] | Energy-decay tick loop and convergence |
//! | [`collide`] | Pairwise overlap resolution |
//! | [`spatial`] | Point quadtree for neighbor queries |
//! | [`node`] | Tile inputs, placed outputs, seeding, node arena |
//! | [`drag`] | Pan controller with rubber-band and snap-back |
//! | [`damping`] | Elastic clamp and its inverse |
//! | [`bounds`] | Legal offset range from content and viewport sizes |
//! | [`spring`] | Damped spring for the snap-back |
//! | [`camera`] | Points, sizes, and the pan camera |
//! | [`input`] | Buttons, drag deltas, pointer gesture state |
//! | [`config`] | Layout and drag tuning, environment overrides |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants |

pub mod bounds;
pub mod camera;
pub mod collide;
pub mod config;
pub mod consts;
pub mod damping;
pub mod drag;
pub mod driver;
pub mod engine;
pub mod error;
pub mod input;
pub mod node;
pub mod simulation;
pub mod spatial;
pub mod spring;
