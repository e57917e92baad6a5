//! Integration Tests Module
//!
//! End-to-end coverage of the editing pipeline: document analysis through
//! the public API, perception classification, planning fallbacks, retrieval
//! degradation, the generation cascade, and full orchestrator runs against
//! mocked collaborators.

// Shared mock collaborators and fixture documents
mod common;

// Document analyzer property tests
mod analyzer_test;

// Perception intent/scope classification tests
mod perception_test;

// Planning stage and rule-based fallback tests
mod planning_test;

// Retrieval fan-out and degradation tests
mod retrieval_test;

// Generation cascade tests
mod generation_test;

// Orchestrator end-to-end tests
mod orchestrator_test;
