pub mod driver;
pub mod event;
pub mod runner;

pub use driver::{Tdc, TdcOutputs};
pub use runner::{run, run_with};
