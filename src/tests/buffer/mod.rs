//! LineBuffer tests.
