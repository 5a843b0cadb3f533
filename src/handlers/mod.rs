pub mod activator;
pub mod enricher;
pub mod poller;

#[cfg(test)]
pub(crate) mod fakes;
