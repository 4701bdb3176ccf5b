//! Client side of the image processing form: state, rendering helpers, and
//! the command handlers that talk to the process endpoint.

mod controller;
pub mod error;
pub mod transport;
pub mod view;

pub use controller::{FormController, ProcessedImages};
pub use error::{ProcessError, TransportError};
pub use transport::{resolve_url, HttpProcessClient, ProcessTransport, SelectedFile, Submission};
pub use view::{render_meta, FormState, PreviewPane, StatusLine, Trigger, ViewState};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;
