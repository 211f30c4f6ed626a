//! Wayfinder - LLM-Guided Travel Analysis Service
//!
//! This crate implements an iterative tool-orchestration engine: a reasoning
//! engine decides, turn by turn, which map tools to invoke through a remote
//! JSON-RPC gateway, accumulates the results, and synthesizes a final answer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
