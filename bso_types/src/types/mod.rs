mod asset;
mod object;
mod schema;

pub use asset::*;
pub use object::*;
pub use schema::*;
