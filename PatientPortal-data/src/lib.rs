// PatientPortal Data
// This crate handles all interaction with the hospital REST backend

// HTTP gateway: configuration, client and error types
pub mod gateway;

// Repository implementations for data access
pub mod repository;

// Wire models exchanged with the backend
pub mod models;
