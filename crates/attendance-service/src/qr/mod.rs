//! Badge QR codes for printing employee cards.

pub mod badge;

pub use badge::{BADGE_MIME, BadgeHolder, BadgePayload, BadgeQr, QrService};
