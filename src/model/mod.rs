pub mod demand;
pub mod queues;
pub mod role;
pub mod team;
