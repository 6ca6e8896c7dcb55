pub mod auth;
pub mod categories;
pub mod currencies;
pub mod settings;

pub use auth::*;
pub use categories::*;
pub use currencies::*;
pub use settings::*;
