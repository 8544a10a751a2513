mod abc;

pub use abc::{Actor, Critic, Value};
