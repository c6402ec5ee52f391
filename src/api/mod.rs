pub mod instamojo_client;
pub mod verify;
