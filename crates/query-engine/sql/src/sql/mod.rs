//! SQL AST, its rendering to parameterized SQL text, and the plan handed to execution.

pub mod ast;
pub mod convert;
pub mod execution_plan;
pub mod helpers;
pub mod string;
