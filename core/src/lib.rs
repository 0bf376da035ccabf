pub mod error;
pub mod extract;
pub mod index;
pub mod model;

pub use error::{IndexError, IndexResult};
pub use extract::extract_markers;
pub use index::MarkerIndex;
pub use model::{LineMarker, Marker};
