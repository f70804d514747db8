pub mod block;
pub mod doctor;
pub mod file_ops;
pub mod filter;
pub mod index;
pub mod info;
pub mod layout;
pub mod output;
pub mod preset;
pub mod search;
pub mod session;
pub mod tag;
