// PatientPortal-api lib.rs
//
// HTTP surface of the patient portal: routes, handlers and OpenAPI docs.

pub mod api;
pub mod openapi;

pub use api::create_application;
