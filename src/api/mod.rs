pub mod activity;
pub mod attendance;
pub mod block;
pub mod login;
pub mod room;
pub mod student;
