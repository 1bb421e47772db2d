//! Integration tests that drive the assembled engine through the
//! public facade, on the in-memory backends.

mod helpers;

mod feed_flow_test;
mod push_test;
mod retention_test;
