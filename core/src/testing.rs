pub mod console;
pub mod harness;
pub mod judge;
pub mod normalize;
pub mod testcase;
pub mod verdict;

pub use console::ConsoleReporter;
pub use harness::*;
pub use judge::*;
pub use normalize::*;
pub use testcase::*;
pub use verdict::*;
