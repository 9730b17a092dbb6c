pub mod object;
pub mod environment;
pub mod builtins;
pub mod evaluator;
