mod grouping;
mod projection;
mod renderer;
mod style;

pub use grouping::*;
pub use projection::*;
pub use renderer::*;
pub use style::*;
