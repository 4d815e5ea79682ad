mod correlation_tests;
mod merge_tests;
