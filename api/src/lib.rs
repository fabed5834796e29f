//! REST API for chatting with an LLM that can call tools on a remote MCP server

pub mod client;
pub mod config;
pub mod llm;
pub mod mcp;
pub mod web;
