//! # Wallet Core Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # History pipeline benchmarks
//! └── src/integration/  # Cross-module flows through the runtime
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wallet-tests
//! cargo bench -p wallet-tests
//! ```

pub mod integration;
