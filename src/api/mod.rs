// HTTP access to the habit server

pub mod client;

pub use client::{ApiClient, CHANGE_PASSWORD_PATH, HABITS_PATH, PROFILE_PATH};
