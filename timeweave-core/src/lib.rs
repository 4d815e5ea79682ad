pub mod alignment;
pub mod cli;
pub mod conf;
pub mod correlation;
pub mod error;
pub mod event;
pub mod grouping;
pub mod logging;
pub mod merge;
pub mod model;
pub mod output;
pub mod timeline;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
