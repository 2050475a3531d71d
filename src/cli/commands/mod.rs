mod fetch;
mod resolve;

pub use fetch::cmd_fetch;
pub use resolve::cmd_resolve;
