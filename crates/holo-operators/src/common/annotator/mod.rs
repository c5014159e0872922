pub mod completeness;

use holo_sdk::OperatorRegistry;

pub fn register(registry: &mut OperatorRegistry) {
    completeness::register(registry);
}
