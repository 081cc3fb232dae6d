pub mod deflicker;
pub mod despeckle;

pub use deflicker::deflicker;
pub use despeckle::despeckle;
