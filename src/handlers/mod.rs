// Handler tiers mirror the gate's route classes:
// auth/  - token acquisition and the session-check endpoint
// admin/ - aggregation APIs under /api/admin (downstream of the gate)
// pages  - HTML shells for the admin pages

pub mod admin;
pub mod auth;
pub mod pages;
