pub mod annotator;
pub mod filter;
pub mod transformer;

use holo_sdk::OperatorRegistry;

pub fn register(registry: &mut OperatorRegistry) {
    transformer::register(registry);
    annotator::register(registry);
    filter::register(registry);
}
