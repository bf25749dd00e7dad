pub mod category;
pub mod dashboard;
pub mod leaderboard;
pub mod participant;
pub mod result;
pub mod school;
