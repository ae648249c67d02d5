pub mod agent_service;
pub mod assistant;
pub mod rag_service;
pub mod retriever_tool;
pub mod sql_toolkit;
pub mod tools;
