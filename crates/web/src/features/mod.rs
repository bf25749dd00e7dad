pub mod dashboard;
pub mod health;
pub mod home;
pub mod leaderboard;
pub mod register;
pub mod results;
