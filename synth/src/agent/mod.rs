//! Agents built on the state graph. Currently one: the research assistant.

pub mod research;
