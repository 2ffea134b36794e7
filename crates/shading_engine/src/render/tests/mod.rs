//! Pipeline integration tests
//!
//! End-to-end checks that drive whole frames through the render graph.
