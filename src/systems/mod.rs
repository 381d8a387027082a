mod aging;
mod birth;
mod death;
mod feeding;
mod fodder;
mod migration;

pub use aging::AgingSystem;
pub use birth::BirthSystem;
pub use death::DeathSystem;
pub use feeding::FeedingSystem;
pub use fodder::{ProduceFodderSystem, ResetFodderSystem};
pub use migration::{MigrationSystem, MovePermitSystem};
