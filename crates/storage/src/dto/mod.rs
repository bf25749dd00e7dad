pub mod common;
pub mod dashboard;
pub mod event;
pub mod leaderboard;
pub mod registration;
pub mod results;
