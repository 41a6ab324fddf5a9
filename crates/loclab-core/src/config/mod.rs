pub mod consts;

mod model;

pub use model::LockSettings;
