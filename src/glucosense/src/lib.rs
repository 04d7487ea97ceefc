#[macro_use]
extern crate log;

mod dashboard;
pub use dashboard::{Dashboard, DashboardExport, DashboardUpdate};

pub use glucosense_algos as algo;
pub use glucosense_feed as feed;
pub use glucosense_types as types;
