pub mod manager;

pub use manager::{
    TaskManager,
    TaskSender,
};
