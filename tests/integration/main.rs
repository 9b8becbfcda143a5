//! Integration tests for exFAT path resolution

mod concurrency;
mod refcount_balance;
mod resolution;
mod support;
