//! The layout pipeline: ranking, crossing reduction, coordinate assignment and
//! the façade that ties them together.

pub mod layout;
pub mod optimizer;
pub mod placer;
pub mod rank;
