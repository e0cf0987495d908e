pub mod category;
pub mod detection;
pub mod errors;
pub mod model;
pub mod record;
pub mod share;
