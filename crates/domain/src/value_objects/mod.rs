//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod transport_mode;

pub use coordinate::{Coordinate, InvalidCoordinates};
pub use transport_mode::TransportMode;
