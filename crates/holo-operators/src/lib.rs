pub mod common;
pub mod person;

use holo_sdk::OperatorRegistry;

pub fn register_all(registry: &mut OperatorRegistry) -> Result<(), holo_sdk::Error> {
    // Generic operators first, then the person-specific annotators
    common::register(registry);
    person::register(registry);
    Ok(())
}
