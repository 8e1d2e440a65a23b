//! Scenario tests over whole documents
