pub mod driver;
pub mod feed;
pub mod handler;

pub use driver::{RunPlan, SimulationDriver};
pub use feed::SampleFeed;
pub use handler::SampleHandler;
