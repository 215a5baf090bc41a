pub mod live;
pub mod poller;
pub mod status;

pub use live::LiveRender;
pub use poller::*;
pub use status::*;
