//! Session store backing refresh tokens

mod store;


pub use store::SessionStore;
