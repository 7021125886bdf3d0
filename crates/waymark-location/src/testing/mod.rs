//! Headless stand-ins for the browser.
//!
//! [`SimulatedWindow`] keeps a history stack of absolute URLs and fires
//! `hashchange`/`popstate` the way a browser does. [`SimulatedNavigation`]
//! adds the Navigation API on top: `navigate` events, interception, and
//! traversal. Interception handlers are queued and run by
//! [`SimulatedNavigation::flush`], mirroring the browser committing the URL
//! before the handler settles.

mod navigation;
mod window;

pub use navigation::{SimulatedNavigateEvent, SimulatedNavigation};
pub use window::SimulatedWindow;
