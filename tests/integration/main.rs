//! End-to-end tests driving the router against the in-memory store.

mod helpers;

mod auth_test;
mod dashboard_test;
mod event_types_test;
mod events_test;
mod qr_test;
mod users_test;
