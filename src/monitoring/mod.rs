/*!
 * Monitoring
 * Engine notifications and structured tracing
 */

mod bus;
pub mod events;
mod tracer;

pub use bus::{EventBus, ObserverId};
pub use events::{Event, EventKind};
pub use tracer::init_tracing;
