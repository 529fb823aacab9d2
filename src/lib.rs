pub mod app;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod extract;
pub mod media;
pub mod messages;
pub mod projects;
pub mod skills;
pub mod software_applications;
pub mod state;
pub mod timelines;
pub mod users;

#[cfg(test)]
mod test_utils;
