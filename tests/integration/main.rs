//! Integration tests for GastroMiner
//!
//! These tests use wiremock to stand in for the XML query service and its
//! robots.txt, and run full extractions end-to-end into temporary files.

mod common;
mod extraction_tests;
mod policy_tests;
