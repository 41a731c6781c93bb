//! Safe SQL builder: identifiers from static mappings only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
