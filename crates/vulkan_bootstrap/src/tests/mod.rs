//! Cross-component session scenarios
