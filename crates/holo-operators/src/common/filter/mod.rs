pub mod numeric_range_filter;

use holo_sdk::OperatorRegistry;

pub fn register(registry: &mut OperatorRegistry) {
    numeric_range_filter::register(registry);
}
