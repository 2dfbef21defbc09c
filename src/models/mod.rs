pub mod crop;
pub mod environmental;
pub mod farm;
pub mod forecast;
pub mod recommendation;

pub use crop::*;
pub use environmental::*;
pub use farm::*;
pub use forecast::*;
pub use recommendation::*;
