pub mod ast;
pub mod print;
pub mod traverse;
