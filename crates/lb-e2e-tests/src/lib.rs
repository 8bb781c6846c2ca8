//! End-to-end tests for logbridge live under `tests/`.
