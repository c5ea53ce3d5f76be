mod domains;
mod dump;

pub use domains::run_domains;
pub use dump::run_dump;
