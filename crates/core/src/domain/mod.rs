pub mod addon;
pub mod contact;
pub mod draft;
pub mod order;
pub mod service;
