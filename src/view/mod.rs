//! Terminal screens
//!
//! Every function here turns state into a text frame. Nothing in this
//! module talks to the network or mutates feed or purchase state.

pub mod home;
pub mod list;
pub mod purchase;
mod skin;
mod stats;

pub use list::ListRow;
pub use skin::Skin;
pub use stats::ListStats;
