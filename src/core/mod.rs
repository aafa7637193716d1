pub mod classifier;
pub mod pool;
pub mod rules;
pub mod selector;
pub mod session;

#[cfg(test)]
mod proptests;
