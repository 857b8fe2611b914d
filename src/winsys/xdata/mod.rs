pub mod input;
pub mod xconnection;
