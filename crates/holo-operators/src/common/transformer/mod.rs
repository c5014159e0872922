pub mod project;
pub mod sentinel;

use holo_sdk::OperatorRegistry;

pub fn register(registry: &mut OperatorRegistry) {
    sentinel::register(registry);
    project::register(registry);
}
