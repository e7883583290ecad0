//! Integration tests for the Bindable workspace.
//!
//! Nothing lives here; the tests in `tests/` drive `bindable-channel`
//! through its public API with the helpers from `bindable-test`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
