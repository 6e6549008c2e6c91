//! Built-in template catalogs, one per stack

mod fastapi;
mod flask;
mod python;
mod react;

pub use fastapi::FastApiBlueprint;
pub use flask::FlaskBlueprint;
pub use react::ReactBlueprint;
