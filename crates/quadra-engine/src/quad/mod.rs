//! Textured quad model.
//!
//! Every image draw lowers into one [`DrawOptions`], is resolved against the
//! image's native size exactly once ([`ResolvedQuad`]), and only then is handed
//! to a backend. Corner rotation and texture-coordinate mapping live here so the
//! GPU and canvas backends share a single implementation.

mod geometry;
mod options;

pub use geometry::{ResolvedQuad, Vertex, QUAD_INDICES};
pub use options::DrawOptions;
